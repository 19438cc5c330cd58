//! Tab navigation and focus.

use tracing::debug;

use crate::error::Result;
use crate::protocol::{BrowsingContextCommand, Command};

use super::Tab;

// ============================================================================
// Tab - Navigation
// ============================================================================

impl Tab {
    /// Navigates to a URL.
    ///
    /// # Errors
    ///
    /// Returns an error if navigation fails.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url = %url, tab_id = %self.inner.tab_id, "Navigating");

        let command = Command::BrowsingContext(BrowsingContextCommand::Navigate {
            url: url.to_string(),
        });

        self.send_command(command).await?;
        Ok(())
    }

    /// Makes this tab the active tab and raises its window.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension cannot activate the tab.
    pub async fn focus(&self) -> Result<()> {
        debug!(tab_id = %self.inner.tab_id, "Focusing tab");
        self.send_command(Command::BrowsingContext(BrowsingContextCommand::FocusTab))
            .await?;
        self.send_command(Command::BrowsingContext(BrowsingContextCommand::FocusWindow))
            .await?;
        Ok(())
    }

    /// Closes this tab.
    pub async fn close(&self) -> Result<()> {
        debug!(tab_id = %self.inner.tab_id, "Closing tab");
        let command = Command::BrowsingContext(BrowsingContextCommand::CloseTab);
        self.send_command(command).await?;
        Ok(())
    }
}
