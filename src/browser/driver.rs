//! Seam between the tab-cycle controller and a live browser.

use async_trait::async_trait;

use crate::error::Result;
use crate::identifiers::TabId;

use super::Action;

/// Browser operations the controller needs.
///
/// Implemented by [`Window`](super::Window) for a real Firefox instance.
/// Tests substitute a recording implementation.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Opens a tab, runs `actions` in it and returns its ID.
    ///
    /// `name` is used only for logging.
    async fn create_tab(&self, name: &str, actions: &[Action]) -> Result<TabId>;

    /// Brings `tab_id` to the front.
    async fn activate(&self, tab_id: TabId) -> Result<()>;

    /// Captures the visible area of `tab_id` as PNG bytes.
    ///
    /// The tab must be in front.
    async fn capture_screenshot(&self, tab_id: TabId) -> Result<Vec<u8>>;

    /// Shuts the browser down.
    async fn close(&self) -> Result<()>;
}
