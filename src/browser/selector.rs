//! Element locator strategies.
//!
//! Tab scripts address elements by XPath; CSS is accepted for
//! programmatic use.
//!
//! ```ignore
//! use firefox_kiosk::By;
//!
//! let submit = By::xpath("//button[@type='submit']");
//! let user = By::css("input[name=user]");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// CSS selector.
    #[serde(rename = "css")]
    Css(String),

    /// XPath expression.
    #[serde(rename = "xpath")]
    XPath(String),
}

impl By {
    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Returns the strategy name for the protocol.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v) | Self::XPath(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy(), self.value())
    }
}

// ============================================================================
// Tests
// ============================================================================
