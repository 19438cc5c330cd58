//! Browser actions a tab script expands into.

use std::fmt;

use super::selector::By;

// ============================================================================
// Action
// ============================================================================

/// One browser operation performed while setting up a tab.
///
/// `Debug` never prints typed text, so secrets stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub enum Action {
    /// Load a URL in the tab.
    Navigate {
        /// Target URL.
        url: String,
    },

    /// Wait until an element is present.
    WaitVisible {
        /// Element locator.
        by: By,
    },

    /// Wait for an element, then click it.
    Click {
        /// Element locator.
        by: By,
    },

    /// Wait for an element, then type into it.
    TypeText {
        /// Element locator.
        by: By,
        /// Text to type.
        text: String,
    },
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate { url } => f.debug_struct("Navigate").field("url", url).finish(),
            Self::WaitVisible { by } => f.debug_struct("WaitVisible").field("by", by).finish(),
            Self::Click { by } => f.debug_struct("Click").field("by", by).finish(),
            Self::TypeText { by, text } => f
                .debug_struct("TypeText")
                .field("by", by)
                .field("text_len", &text.len())
                .finish(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_text() {
        let action = Action::TypeText {
            by: By::xpath("//input[@name='password']"),
            text: "hunter2".to_string(),
        };
        let debug = format!("{action:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("text_len: 7"));
    }
}
