//! Display backlight control on VideoCore boards.
//!
//! Wraps two firmware tools:
//!
//! | Command | Use |
//! |---------|-----|
//! | `tvservice -l` | List attached display IDs |
//! | `vcgencmd display_power <-1\|0\|1> <id>` | Query or switch a display |
//!
//! `vcgencmd` answers with a single `display_power=0|1` line, which is parsed
//! strictly.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::process::Output;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

// ============================================================================
// DisplayStatus
// ============================================================================

/// Power state of one display.
///
/// Serialized as `{"display": 2, "status": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayStatus {
    /// Display ID as reported by `tvservice`.
    pub display: u8,
    /// `true` when the backlight is on.
    pub status: bool,
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display, self.status)
    }
}

// ============================================================================
// Backlight
// ============================================================================

/// Backlight operations used by the control surfaces.
#[async_trait]
pub trait Backlight: Send + Sync {
    /// Lists attached display IDs.
    async fn list_displays(&self) -> Result<Vec<u8>>;

    /// Returns whether the backlight of `display` is on.
    async fn get(&self, display: u8) -> Result<bool>;

    /// Switches `display` on or off and returns the state reported back.
    async fn set(&self, display: u8, on: bool) -> Result<bool>;

    /// Inverts the state of `display`.
    async fn toggle(&self, display: u8) -> Result<bool> {
        let on = self.get(display).await?;
        self.set(display, !on).await
    }
}

// ============================================================================
// VideoCore
// ============================================================================

/// [`Backlight`] backed by the VideoCore firmware tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoCore;

#[async_trait]
impl Backlight for VideoCore {
    async fn list_displays(&self) -> Result<Vec<u8>> {
        let output = run("tvservice", &["-l"], "unable to retrieve displays").await?;
        parse_displays(&String::from_utf8_lossy(&output.stdout))
    }

    async fn get(&self, display: u8) -> Result<bool> {
        let id = display.to_string();
        let output = run(
            "vcgencmd",
            &["display_power", "-1", &id],
            "unable to get backlight",
        )
        .await?;
        let on = parse_response(&String::from_utf8_lossy(&output.stdout))?;
        let display_id = display;
        debug!(display_id, on, "Read backlight");
        Ok(on)
    }

    async fn set(&self, display: u8, on: bool) -> Result<bool> {
        let id = display.to_string();
        let value = if on { "1" } else { "0" };
        let output = run(
            "vcgencmd",
            &["display_power", value, &id],
            "unable to set backlight",
        )
        .await?;
        let on = parse_response(&String::from_utf8_lossy(&output.stdout))?;
        let display_id = display;
        info!(display_id, on, "Backlight switched");
        Ok(on)
    }
}

/// Runs `program` and turns a spawn failure or non-zero exit into
/// [`Error::Backlight`] prefixed with `context`.
async fn run(program: &str, args: &[&str], context: &str) -> Result<Output> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| Error::backlight(format!("{context}: {e}")))?;

    if !output.status.success() {
        return Err(Error::backlight(format!(
            "{context}: {program} exited {}. Message: {}",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(output)
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses `tvservice -l` output.
///
/// ```text
/// 2 attached device(s), display ID's are :
/// Display Number 0, type Main LCD
/// Display Number 2, type HDMI 0
/// ```
///
/// The first line carries the count; each following line's third word is
/// a display ID.
pub fn parse_displays(output: &str) -> Result<Vec<u8>> {
    let mut lines = output.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| Error::backlight("tvservice returned no output"))?;
    let count: usize = header
        .split_whitespace()
        .next()
        .and_then(|word| word.parse().ok())
        .ok_or_else(|| Error::backlight(format!("unable to read display count from '{header}'")))?;

    let ids = lines
        .map(|line| {
            line.split_whitespace()
                .nth(2)
                .map(|word| word.trim_end_matches(','))
                .and_then(|word| word.parse::<u8>().ok())
                .ok_or_else(|| Error::backlight(format!("unable to read display ID from '{line}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    if ids.len() != count {
        debug!(expected = count, found = ids.len(), "Display count mismatch");
    }

    Ok(ids)
}

/// Parses `vcgencmd display_power` output.
pub fn parse_response(output: &str) -> Result<bool> {
    let mut status = None;

    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        let parts: Vec<&str> = line.trim().split('=').collect();

        let [key, value] = parts.as_slice() else {
            return Err(Error::backlight(format!(
                "unable to interpret {line} as display status"
            )));
        };

        if *key != "display_power" {
            return Err(Error::backlight(format!(
                "unexpected key {key}; the only acceptable value is 'display_power'"
            )));
        }

        status = Some(match *value {
            "0" => false,
            "1" => true,
            other => {
                return Err(Error::backlight(format!(
                    "unable to interpret {other} as display status; acceptable values are 0 and 1"
                )));
            }
        });
    }

    status.ok_or_else(|| Error::backlight("vcgencmd returned no display status"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_displays() {
        let output = "2 attached device(s), display ID's are : \n\
                      Display Number 0, type Main LCD\n\
                      Display Number 2, type HDMI 0\n";
        assert_eq!(parse_displays(output).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_parse_displays_none_attached() {
        let output = "0 attached device(s), display ID's are : \n";
        assert!(parse_displays(output).unwrap().is_empty());
    }

    #[test]
    fn test_parse_displays_garbage() {
        assert!(parse_displays("").is_err());
        assert!(parse_displays("no displays here").is_err());
        assert!(parse_displays("1 attached\nDisplay Number x, type HDMI").is_err());
    }

    #[test]
    fn test_parse_response_values() {
        assert!(parse_response("display_power=1\n").unwrap());
        assert!(!parse_response("display_power=0").unwrap());
    }

    #[test]
    fn test_parse_response_errors() {
        let err = parse_response("display_power").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Backlight error: unable to interpret display_power as display status"
        );

        let err = parse_response("power=1").unwrap_err();
        assert!(err.to_string().ends_with(
            "unexpected key power; the only acceptable value is 'display_power'"
        ));

        let err = parse_response("display_power=2").unwrap_err();
        assert!(err.to_string().ends_with(
            "unable to interpret 2 as display status; acceptable values are 0 and 1"
        ));

        assert!(parse_response("").is_err());
    }

    #[test]
    fn test_display_status_format() {
        let status = DisplayStatus {
            display: 2,
            status: true,
        };
        assert_eq!(status.to_string(), "2: true");
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({ "display": 2, "status": true })
        );
    }

    struct Fixed(std::sync::atomic::AtomicBool);

    #[async_trait]
    impl Backlight for Fixed {
        async fn list_displays(&self) -> Result<Vec<u8>> {
            Ok(vec![0])
        }
        async fn get(&self, _display: u8) -> Result<bool> {
            Ok(self.0.load(std::sync::atomic::Ordering::SeqCst))
        }
        async fn set(&self, _display: u8, on: bool) -> Result<bool> {
            self.0.store(on, std::sync::atomic::Ordering::SeqCst);
            Ok(on)
        }
    }

    #[tokio::test]
    async fn test_toggle_inverts() {
        let backlight = Fixed(std::sync::atomic::AtomicBool::new(true));
        assert!(!backlight.toggle(0).await.unwrap());
        assert!(backlight.toggle(0).await.unwrap());
    }

    #[tokio::test]
    async fn test_video_core_reports_context() {
        // Only meaningful off VideoCore hardware, where the tools are absent.
        if let Err(e) = VideoCore.get(2).await {
            assert!(e.to_string().contains("unable to get backlight"), "{e}");
        }
        if let Err(e) = VideoCore.set(2, true).await {
            assert!(e.to_string().contains("unable to set backlight"), "{e}");
        }
    }
}
