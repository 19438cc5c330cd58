//! Core Tab struct and accessors.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::identifiers::TabId;
use crate::protocol::{Command, Request, Response};
use crate::transport::Connection;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a tab.
pub(crate) struct TabInner {
    /// Tab ID.
    pub tab_id: TabId,
    /// Connection of the owning window.
    pub connection: Connection,
}

// ============================================================================
// Tab
// ============================================================================

/// A handle to a browser tab.
///
/// Tabs run script actions, come to the front, and capture screenshots.
#[derive(Clone)]
pub struct Tab {
    pub(crate) inner: Arc<TabInner>,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("tab_id", &self.inner.tab_id)
            .finish_non_exhaustive()
    }
}

impl Tab {
    /// Creates a new tab handle.
    pub(crate) fn new(tab_id: TabId, connection: Connection) -> Self {
        Self {
            inner: Arc::new(TabInner { tab_id, connection }),
        }
    }

    /// Returns the tab ID.
    #[inline]
    #[must_use]
    pub fn tab_id(&self) -> TabId {
        self.inner.tab_id
    }

    /// Sends a command addressed to this tab and returns the response.
    pub(crate) async fn send_command(&self, command: Command) -> Result<Response> {
        let request = Request::new(self.inner.tab_id, command);
        self.inner.connection.send(request).await
    }
}

// ============================================================================
// Tests
// ============================================================================
