//! Preferences written to the profile's `user.js`.
//!
//! Each preference becomes one JavaScript call:
//!
//! ```javascript
//! user_pref("browser.startup.page", 0);
//! ```
//!
//! Extra preferences arrive from the command line as `key=value`; the value
//! is typed by its spelling (`true`/`false`, an integer, anything else is a
//! string).

use std::fmt;

use crate::error::{Error, Result};

// ============================================================================
// PreferenceValue
// ============================================================================

/// A preference value in `user.js`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreferenceValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i32),
    /// String value.
    String(String),
}

impl PreferenceValue {
    /// Types a command-line literal.
    #[must_use]
    pub fn infer(literal: &str) -> Self {
        match literal {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            other => other
                .parse::<i32>()
                .map_or_else(|_| Self::String(other.to_string()), Self::Int),
        }
    }

    /// Formats the value as a JavaScript literal.
    #[must_use]
    pub fn to_js_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::String(s) => format!("\"{}\"", escape_js_string(s)),
        }
    }
}

impl From<bool> for PreferenceValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PreferenceValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for PreferenceValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

// ============================================================================
// FirefoxPreference
// ============================================================================

/// A named preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirefoxPreference {
    /// Preference name, e.g. `browser.startup.page`.
    pub key: String,
    /// Preference value.
    pub value: PreferenceValue,
}

impl FirefoxPreference {
    /// Creates a preference.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<PreferenceValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parses a `key=value` assignment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if there is no `=` or the key is empty.
    pub fn parse(assignment: &str) -> Result<Self> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            Error::config(format!(
                "invalid preference '{assignment}'; expected key=value"
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(Error::config(format!(
                "invalid preference '{assignment}'; the key must not be empty"
            )));
        }

        Ok(Self::new(key, PreferenceValue::infer(value.trim())))
    }

    /// Renders the `user_pref("key", value);` line.
    #[must_use]
    pub fn to_user_pref_line(&self) -> String {
        format!(
            "user_pref(\"{}\", {});",
            escape_js_string(&self.key),
            self.value.to_js_string()
        )
    }
}

impl fmt::Display for FirefoxPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value.to_js_string())
    }
}

fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

// ============================================================================
// Tests
// ============================================================================
