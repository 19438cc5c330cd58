//! Running script actions against a tab.

use tracing::debug;

use crate::browser::Action;
use crate::error::Result;

use super::Tab;

// ============================================================================
// Tab - Actions
// ============================================================================

impl Tab {
    /// Performs one action.
    pub async fn perform(&self, action: &Action) -> Result<()> {
        match action {
            Action::Navigate { url } => self.goto(url).await,
            Action::WaitVisible { by } => self.wait_for_element(by).await.map(|_| ()),
            Action::Click { by } => self.click(by).await,
            Action::TypeText { by, text } => self.type_text(by, text).await,
        }
    }

    /// Performs `actions` in order, stopping at the first failure.
    pub async fn run(&self, actions: &[Action]) -> Result<()> {
        for (index, action) in actions.iter().enumerate() {
            debug!(tab_id = %self.inner.tab_id, index, ?action, "Performing action");
            self.perform(action).await?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
