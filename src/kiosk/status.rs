//! Best-effort status notifications.
//!
//! Observers (the WebSocket status stream, log output) subscribe to a
//! bounded broadcast channel. Publishing never blocks the switching path:
//! without subscribers an update is dropped, and a subscriber that falls
//! behind skips to the newest updates.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use crate::backlight::DisplayStatus;
use crate::identifiers::TabId;

// ============================================================================
// Constants
// ============================================================================

/// Updates buffered per subscriber before the oldest are dropped.
const STATUS_CAPACITY: usize = 16;

// ============================================================================
// StatusUpdate
// ============================================================================

/// Snapshot of the kiosk state.
///
/// Serialized as `{"isTabSwitching": .., "currentTab": .., "backlight": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Whether the switch cycle is running.
    pub is_tab_switching: bool,

    /// The frontmost tab, if a switch has happened.
    pub current_tab: Option<TabId>,

    /// Backlight state, when the update was caused by a backlight change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlight: Option<DisplayStatus>,
}

// ============================================================================
// StatusSink
// ============================================================================

/// Bounded, non-blocking broadcast of [`StatusUpdate`]s.
#[derive(Debug, Clone)]
pub struct StatusSink {
    sender: broadcast::Sender<StatusUpdate>,
}

impl Default for StatusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink {
    /// Creates a sink with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(STATUS_CAPACITY);
        Self { sender }
    }

    /// Publishes an update to all current subscribers.
    pub fn publish(&self, update: StatusUpdate) {
        match self.sender.send(update) {
            Ok(receivers) => trace!(receivers, "Status published"),
            Err(_) => trace!("Status dropped, no subscribers"),
        }
    }

    /// Subscribes to future updates.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusUpdate> {
        self.sender.subscribe()
    }

    /// Returns the number of live subscribers.
    #[inline]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

// ============================================================================
// Tests
// ============================================================================
