//! Event message types.
//!
//! Events are notifications sent from the extension when browser activity
//! occurs. The kiosk consumes element observation and navigation events.
//!
//! | Module | Events |
//! |--------|--------|
//! | `browsingContext` | `load`, `navigationFailed` |
//! | `element` | `added` |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::identifiers::RequestId;

// ============================================================================
// Event
// ============================================================================

/// An event notification from remote end to local end.
///
/// # Format
///
/// ```json
/// {
///   "id": "event-uuid",
///   "type": "event",
///   "method": "module.eventName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Unique identifier assigned by the extension.
    pub id: RequestId,

    /// Event name in `module.eventName` format.
    pub method: String,

    /// Event-specific data.
    #[serde(default)]
    pub params: Value,
}

impl Event {
    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        match self.method.as_str() {
            "browsingContext.load" => ParsedEvent::Load {
                tab_id: self.get_u32("tabId"),
                url: self.get_string("url"),
            },

            "browsingContext.navigationFailed" => ParsedEvent::NavigationFailed {
                tab_id: self.get_u32("tabId"),
                url: self.get_string("url"),
                error: self.get_string("error"),
            },

            "element.added" => ParsedEvent::ElementAdded {
                strategy: self.get_string("strategy"),
                value: self.get_string("value"),
                element_id: self.get_string("elementId"),
                tab_id: self.get_u32("tabId"),
            },

            _ => ParsedEvent::Unknown {
                method: self.method.clone(),
            },
        }
    }

    #[inline]
    fn get_string(&self, key: &str) -> String {
        self.params
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    #[inline]
    fn get_u32(&self, key: &str) -> u32 {
        self.params
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_default()
    }
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Parsed event types for type-safe handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEvent {
    /// Page load complete.
    Load {
        /// Tab ID.
        tab_id: u32,
        /// Page URL.
        url: String,
    },

    /// Navigation failed.
    NavigationFailed {
        /// Tab ID.
        tab_id: u32,
        /// Page URL.
        url: String,
        /// Error message.
        error: String,
    },

    /// Element matching a subscription appeared in the DOM.
    ElementAdded {
        /// Locator strategy.
        strategy: String,
        /// Locator value.
        value: String,
        /// Element ID.
        element_id: String,
        /// Tab ID.
        tab_id: u32,
    },

    /// Event the kiosk does not handle.
    Unknown {
        /// Event method.
        method: String,
    },
}

// ============================================================================
// Tests
// ============================================================================
