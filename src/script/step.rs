//! Individual script steps.

use std::env;
use std::fmt;

use crate::browser::{Action, By};
use crate::error::{Error, Result};

// ============================================================================
// Step
// ============================================================================

/// One line of a tab script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `go: <url>`
    Go(String),
    /// `wait: <xpath>`
    Wait(String),
    /// `click: <xpath>`
    Click(String),
    /// `type: {xpath, value | secret}`
    Type(TypeStep),
}

/// Attributes of a `type` step.
///
/// Exactly one of `value` and `secret` is expected to be non-empty; when
/// both are, `value` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeStep {
    /// Target element.
    pub xpath: String,
    /// Literal text.
    pub value: Option<String>,
    /// Name of the environment variable holding the text.
    pub secret: Option<String>,
}

impl TypeStep {
    fn literal(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    fn secret_name(&self) -> Option<&str> {
        self.secret.as_deref().filter(|v| !v.is_empty())
    }
}

impl Step {
    /// Checks that the step carries everything it needs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Script`] naming the missing piece.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Go(value) | Self::Wait(value) | Self::Click(value) if value.is_empty() => {
                Err(Error::script("value must not be empty"))
            }
            Self::Type(step) if step.xpath.is_empty() => {
                Err(Error::script("value for xpath must not be empty"))
            }
            Self::Type(step) if step.literal().is_none() && step.secret_name().is_none() => Err(
                Error::script("either value or secret must be provided and not be empty"),
            ),
            _ => Ok(()),
        }
    }

    /// Converts the step into a browser action.
    ///
    /// Secrets are read from the environment here, not at parse time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Script`] if a secret's environment variable is unset.
    pub fn action(&self) -> Result<Action> {
        Ok(match self {
            Self::Go(url) => Action::Navigate { url: url.clone() },
            Self::Wait(xpath) => Action::WaitVisible {
                by: By::xpath(xpath),
            },
            Self::Click(xpath) => Action::Click {
                by: By::xpath(xpath),
            },
            Self::Type(step) => {
                let text = match (step.literal(), step.secret_name()) {
                    (Some(value), _) => value.to_string(),
                    (None, Some(name)) => env::var(name).map_err(|_| {
                        Error::script(format!(
                            "secret '{name}' is not set in the environment"
                        ))
                    })?,
                    (None, None) => {
                        return Err(Error::script(
                            "either value or secret must be provided and not be empty",
                        ));
                    }
                };
                Action::TypeText {
                    by: By::xpath(&step.xpath),
                    text,
                }
            }
        })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Go(url) => write!(f, "go to {url}"),
            Self::Wait(xpath) => write!(f, "wait for the element addressed by '{xpath}'"),
            Self::Click(xpath) => write!(f, "click the element addressed by '{xpath}'"),
            Self::Type(step) => match step.literal() {
                Some(value) => write!(
                    f,
                    "type '{value}' into the element addressed by '{}'",
                    step.xpath
                ),
                None => write!(
                    f,
                    "type the secret into the element addressed by '{}'",
                    step.xpath
                ),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
