//! YAML script parsing.
//!
//! ```yaml
//! - name: Grafana
//!   script:
//!     - go: https://grafana.example/login
//!     - type:
//!         xpath: //input[@name='user']
//!         value: kiosk
//!     - type:
//!         xpath: //input[@name='password']
//!         secret: GRAFANA_PASSWORD
//!     - click: //button[@type='submit']
//!     - wait: //div[@class='dashboard']
//! ```

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

use super::TabDefinition;
use super::step::{Step, TypeStep};

// ============================================================================
// Raw Document
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawTab {
    name: String,
    #[serde(default)]
    script: Option<Vec<Mapping>>,
}

// ============================================================================
// Parse
// ============================================================================

/// Parses a script document into tab definitions.
///
/// Every step is validated; the first problem aborts parsing.
///
/// # Errors
///
/// - [`Error::Yaml`] if the document is not a list of `{name, script}` maps
/// - [`Error::Script`] for an unknown or malformed step
pub fn parse(markup: &str) -> Result<Vec<TabDefinition>> {
    if markup.trim().is_empty() {
        return Ok(Vec::new());
    }

    let raw: Option<Vec<RawTab>> = serde_yaml::from_str(markup)?;

    raw.unwrap_or_default()
        .into_iter()
        .map(|tab| {
            let steps = tab
                .script
                .unwrap_or_default()
                .iter()
                .map(parse_step)
                .collect::<Result<Vec<_>>>()?;
            Ok(TabDefinition::new(tab.name, steps))
        })
        .collect()
}

fn parse_step(raw: &Mapping) -> Result<Step> {
    if raw.len() != 1 {
        return Err(Error::script(format!(
            "a step must have exactly one key, found {}",
            raw.len()
        )));
    }

    let Some((key, value)) = raw.iter().next() else {
        return Err(Error::script("a step must have exactly one key, found 0"));
    };

    let step = match key.as_str() {
        Some("go") => Step::Go(expect_str(value, "Go")?),
        Some("wait") => Step::Wait(expect_str(value, "Wait")?),
        Some("click") => Step::Click(expect_str(value, "Click")?),
        Some("type") => Step::Type(parse_type(value)?),
        _ => {
            return Err(Error::script(format!(
                "'{}' is not a known step",
                describe(key)
            )));
        }
    };

    step.validate()?;
    Ok(step)
}

fn parse_type(value: &Value) -> Result<TypeStep> {
    let Value::Mapping(attributes) = value else {
        return Err(Error::script(format!(
            "unable to parse '{}' as value of a Type step",
            describe(value)
        )));
    };

    let mut step = TypeStep::default();

    for (key, value) in attributes {
        match key.as_str() {
            Some("xpath") => step.xpath = expect_attribute(value, "xpath")?,
            Some("value") => step.value = Some(expect_attribute(value, "value")?),
            Some("secret") => step.secret = Some(expect_attribute(value, "secret")?),
            _ => {
                return Err(Error::script(format!(
                    "'{}' is not a known key for a Type step",
                    describe(key)
                )));
            }
        }
    }

    Ok(step)
}

fn expect_str(value: &Value, step: &str) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        Error::script(format!(
            "unable to parse '{}' as value of a {step} step",
            describe(value)
        ))
    })
}

fn expect_attribute(value: &Value, attribute: &str) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        Error::script(format!(
            "unable to convert '{}' as '{attribute}' value of a Type step",
            describe(value)
        ))
    })
}

/// Renders a YAML value for an error message; null shows as `<nil>`.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "<nil>".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn script_error(markup: &str) -> String {
        match parse(markup) {
            Err(Error::Script { message }) => message,
            other => panic!("expected script error, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------------
    // Invalid Steps
    // ------------------------------------------------------------------------

    #[test]
    fn test_go_missing_value() {
        let markup = "
- name: Missing Value
  script:
    - wait: foo
    - go:
";
        assert_eq!(script_error(markup), "unable to parse '<nil>' as value of a Go step");
    }

    #[test]
    fn test_go_empty_value() {
        let markup = "
- name: Empty Value
  script:
    - wait: foo
    - go: \"\"
";
        assert_eq!(script_error(markup), "value must not be empty");
    }

    #[test]
    fn test_wait_missing_value() {
        let markup = "
- name: Missing Value
  script:
    - wait:
    - go: foo
";
        assert_eq!(script_error(markup), "unable to parse '<nil>' as value of a Wait step");
    }

    #[test]
    fn test_wait_empty_value() {
        let markup = "
- name: Empty Value
  script:
    - wait: \"\"
    - go: foo
";
        assert_eq!(script_error(markup), "value must not be empty");
    }

    #[test]
    fn test_click_missing_value() {
        let markup = "
- name: Missing Value
  script:
    - click:
    - go: foo
";
        assert_eq!(script_error(markup), "unable to parse '<nil>' as value of a Click step");
    }

    #[test]
    fn test_click_empty_value() {
        let markup = "
- name: Empty Value
  script:
    - click: \"\"
";
        assert_eq!(script_error(markup), "value must not be empty");
    }

    #[test]
    fn test_type_missing_value() {
        let markup = "
- name: Missing Value
  script:
    - type:
    - go: foo
";
        assert_eq!(script_error(markup), "unable to parse '<nil>' as value of a Type step");
    }

    #[test]
    fn test_type_wrong_value_kind() {
        let markup = "
- name: Empty Value
  script:
    - type: \"\"
";
        assert_eq!(script_error(markup), "unable to parse '' as value of a Type step");
    }

    #[test]
    fn test_type_attribute_errors() {
        let cases = [
            (
                "xpath:\n        value: not empty",
                "unable to convert '<nil>' as 'xpath' value of a Type step",
            ),
            (
                "xpath: \"\"\n        value: not empty",
                "value for xpath must not be empty",
            ),
            (
                "xpath: not empty\n        value:",
                "unable to convert '<nil>' as 'value' value of a Type step",
            ),
            (
                "xpath: not empty\n        value: \"\"",
                "either value or secret must be provided and not be empty",
            ),
            (
                "xpath: not empty\n        secret:",
                "unable to convert '<nil>' as 'secret' value of a Type step",
            ),
            (
                "xpath: not empty\n        secret: \"\"",
                "either value or secret must be provided and not be empty",
            ),
            (
                "xpath: not empty\n        text: hello",
                "'text' is not a known key for a Type step",
            ),
        ];

        for (attributes, expected) in cases {
            let markup = format!(
                "
- name: Type
  script:
    - type:
        {attributes}
    - go: foo
"
            );
            assert_eq!(script_error(&markup), expected, "attributes: {attributes}");
        }
    }

    #[test]
    fn test_unknown_step() {
        let markup = "
- name: Unknown
  script:
    - scroll: down
";
        assert_eq!(script_error(markup), "'scroll' is not a known step");
    }

    #[test]
    fn test_step_with_two_keys() {
        let markup = "
- name: Ambiguous
  script:
    - go: foo
      click: bar
";
        assert!(script_error(markup).contains("exactly one key"));
    }

    #[test]
    fn test_not_a_list() {
        assert!(matches!(parse("name: nope"), Err(Error::Yaml(_))));
    }

    // ------------------------------------------------------------------------
    // Valid Script
    // ------------------------------------------------------------------------

    const VALID: &str = "
- name: Without script
- name: Empty script
  script:
- name: Hello
  script:
    - go: https://example.com
    - wait: something
    - type:
        xpath: foo
        value: bar
    - type:
        xpath: baz
        secret: s3cret
    - click: button
";

    #[test]
    fn test_valid_script_tabs() {
        let tabs = parse(VALID).unwrap();

        assert_eq!(tabs.len(), 3);
        assert_eq!(tabs[0].name(), "Without script");
        assert!(tabs[0].steps().is_empty());
        assert_eq!(tabs[1].name(), "Empty script");
        assert!(tabs[1].steps().is_empty());
        assert_eq!(tabs[2].name(), "Hello");
        assert_eq!(tabs[2].steps().len(), 5);
    }

    #[test]
    fn test_valid_script_step_descriptions() {
        let tabs = parse(VALID).unwrap();
        let descriptions: Vec<String> = tabs[2].steps().iter().map(ToString::to_string).collect();

        assert_eq!(
            descriptions,
            [
                "go to https://example.com",
                "wait for the element addressed by 'something'",
                "type 'bar' into the element addressed by 'foo'",
                "type the secret into the element addressed by 'baz'",
                "click the element addressed by 'button'",
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(parse("").unwrap().is_empty());
    }
}
