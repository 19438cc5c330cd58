//! Command definitions organized by module.
//!
//! Commands follow `module.methodName` format. The kiosk needs only the
//! subset that drives tab scripts and the switching loop.
//!
//! # Command Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | `browsingContext` | Navigate, new tab, focus, screenshot, close |
//! | `element` | Find, subscribe, call method |
//! | `input` | Type text |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::ElementId;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by module.
///
/// This enum wraps module-specific command enums for unified serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// BrowsingContext module commands.
    BrowsingContext(BrowsingContextCommand),
    /// Element module commands.
    Element(ElementCommand),
    /// Input module commands.
    Input(InputCommand),
}

// ============================================================================
// BrowsingContext Commands
// ============================================================================

/// BrowsingContext module commands for navigation and tab management.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum BrowsingContextCommand {
    /// Navigate to URL.
    #[serde(rename = "browsingContext.navigate")]
    Navigate {
        /// URL to navigate to.
        url: String,
    },

    /// Create new tab.
    #[serde(rename = "browsingContext.newTab")]
    NewTab,

    /// Close current tab.
    #[serde(rename = "browsingContext.closeTab")]
    CloseTab,

    /// Focus tab (make active).
    #[serde(rename = "browsingContext.focusTab")]
    FocusTab,

    /// Focus window (bring to front).
    #[serde(rename = "browsingContext.focusWindow")]
    FocusWindow,

    /// Capture the visible area of the tab.
    #[serde(rename = "browsingContext.captureScreenshot")]
    CaptureScreenshot {
        /// Image format (`png` or `jpeg`).
        format: String,
        /// JPEG quality, ignored for PNG.
        #[serde(skip_serializing_if = "Option::is_none")]
        quality: Option<u8>,
    },
}

// ============================================================================
// Element Commands
// ============================================================================

/// Element module commands for DOM interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ElementCommand {
    /// Find single element by locator.
    #[serde(rename = "element.find")]
    Find {
        /// Locator strategy (`css`, `xpath`).
        strategy: String,
        /// Locator value.
        value: String,
    },

    /// Call method via `element[name](...args)`.
    #[serde(rename = "element.callMethod")]
    CallMethod {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Method name.
        name: String,
        /// Method arguments.
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Observe the DOM until an element matching the locator appears.
    #[serde(rename = "element.subscribe")]
    Subscribe {
        /// Locator strategy.
        strategy: String,
        /// Locator value.
        value: String,
        /// Remove the subscription after the first match.
        #[serde(rename = "oneShot")]
        one_shot: bool,
        /// Give up after this many milliseconds.
        #[serde(skip_serializing_if = "Option::is_none")]
        timeout: Option<u64>,
    },

    /// Cancel a subscription.
    #[serde(rename = "element.unsubscribe")]
    Unsubscribe {
        /// Subscription ID from `element.subscribe`.
        #[serde(rename = "subscriptionId")]
        subscription_id: String,
    },
}

// ============================================================================
// Input Commands
// ============================================================================

/// Input module commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum InputCommand {
    /// Type a string into an element, one key event sequence per character.
    #[serde(rename = "input.typeText")]
    TypeText {
        /// Target element.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Text to type.
        text: String,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browsing_context_navigate() {
        let cmd = BrowsingContextCommand::Navigate {
            url: "https://example.com".to_string(),
        };
        let json = serde_json::to_string(&cmd).expect("serialize");
        assert!(json.contains("browsingContext.navigate"));
        assert!(json.contains("https://example.com"));
    }

    #[test]
    fn test_unit_command_has_no_params() {
        let cmd = Command::BrowsingContext(BrowsingContextCommand::FocusTab);
        let json = serde_json::to_value(&cmd).expect("serialize");
        assert_eq!(json["method"], "browsingContext.focusTab");
    }

    #[test]
    fn test_capture_screenshot_omits_quality() {
        let cmd = BrowsingContextCommand::CaptureScreenshot {
            format: "png".to_string(),
            quality: None,
        };
        let json = serde_json::to_value(&cmd).expect("serialize");
        assert_eq!(json["params"], serde_json::json!({ "format": "png" }));
    }

    #[test]
    fn test_element_subscribe() {
        let cmd = ElementCommand::Subscribe {
            strategy: "xpath".to_string(),
            value: "//a[@href='/profile']".to_string(),
            one_shot: true,
            timeout: Some(30_000),
        };
        let json = serde_json::to_value(&cmd).expect("serialize");
        assert_eq!(json["method"], "element.subscribe");
        assert_eq!(json["params"]["oneShot"], true);
        assert_eq!(json["params"]["strategy"], "xpath");
    }

    #[test]
    fn test_type_text() {
        let cmd = InputCommand::TypeText {
            element_id: ElementId::new("el-1"),
            text: "admin".to_string(),
        };
        let json = serde_json::to_value(&cmd).expect("serialize");
        assert_eq!(json["params"]["elementId"], "el-1");
    }
}
