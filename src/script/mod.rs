//! Tab scripts.
//!
//! A script file lists the tabs to show, in rotation order, each with the
//! steps that bring it into a presentable state (log in, open a dashboard).
//!
//! | Module | Description |
//! |--------|-------------|
//! | `parser` | YAML document to [`TabDefinition`]s |
//! | `step` | [`Step`] validation, description and action |

// ============================================================================
// Submodules
// ============================================================================

mod parser;
mod step;

// ============================================================================
// Re-exports
// ============================================================================

pub use parser::parse;
pub use step::{Step, TypeStep};

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::browser::Action;
use crate::error::{Error, Result};

// ============================================================================
// TabDefinition
// ============================================================================

/// A named tab and the steps that set it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDefinition {
    name: String,
    steps: Vec<Step>,
}

impl TabDefinition {
    /// Creates a definition from already validated steps.
    #[must_use]
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Returns the tab name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the steps in order.
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Builds the browser actions, resolving secrets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Script`] if a secret is not set.
    pub fn actions(&self) -> Result<Vec<Action>> {
        self.steps.iter().map(Step::action).collect()
    }
}

impl fmt::Display for TabDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} actions)", self.name, self.steps.len())
    }
}

/// Reads and parses a script file.
///
/// # Errors
///
/// Returns [`Error::Script`] if the file cannot be read, otherwise whatever
/// [`parse`] reports.
pub async fn load(path: &Path) -> Result<Vec<TabDefinition>> {
    let markup = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::script(format!("unable to read script {}: {e}", path.display()))
    })?;

    let tabs = parse(&markup)?;
    debug!(path = %path.display(), tabs = tabs.len(), "Loaded script");
    Ok(tabs)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::browser::By;

    #[test]
    fn test_display_counts_actions() {
        let tab = TabDefinition::new(
            "Weather",
            vec![
                Step::Go("https://weather.example".to_string()),
                Step::Wait("//main".to_string()),
            ],
        );
        assert_eq!(tab.to_string(), "Weather (2 actions)");
    }

    #[test]
    fn test_actions_follow_steps() {
        let tab = TabDefinition::new(
            "Login",
            vec![
                Step::Go("https://a.example".to_string()),
                Step::Type(TypeStep {
                    xpath: "//input".to_string(),
                    value: Some("kiosk".to_string()),
                    secret: None,
                }),
                Step::Click("//button".to_string()),
            ],
        );

        assert_eq!(
            tab.actions().unwrap(),
            vec![
                Action::Navigate {
                    url: "https://a.example".to_string()
                },
                Action::TypeText {
                    by: By::xpath("//input"),
                    text: "kiosk".to_string()
                },
                Action::Click {
                    by: By::xpath("//button")
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabs.yaml");
        tokio::fs::write(&path, "- name: One\n  script:\n    - go: https://one.example\n")
            .await
            .unwrap();

        let tabs = load(&path).await.unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].to_string(), "One (1 actions)");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/tabs.yaml")).await.unwrap_err();
        assert!(matches!(err, Error::Script { .. }));
    }
}
