//! Command-line configuration.
//!
//! Every option can also come from a `KIOSK_*` environment variable, which
//! keeps credentials and paths out of process listings on the kiosk.

// ============================================================================
// Imports
// ============================================================================

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::control::MqttSettings;
use crate::driver::{FirefoxOptions, FirefoxPreference};
use crate::error::{Error, Result};

// ============================================================================
// Config
// ============================================================================

/// Runtime configuration of the kiosk.
#[derive(Debug, Clone, Parser)]
#[command(name = "firefox-kiosk", version, about)]
pub struct Config {
    /// YAML script listing the tabs to show.
    #[arg(env = "KIOSK_SCRIPT")]
    pub script: PathBuf,

    /// Path to the Firefox binary.
    #[arg(long, env = "KIOSK_FIREFOX")]
    pub firefox: PathBuf,

    /// Path to the control extension (directory or .xpi).
    #[arg(long, env = "KIOSK_EXTENSION")]
    pub extension: PathBuf,

    /// Seconds each tab stays on screen while cycling.
    #[arg(long, env = "KIOSK_INTERVAL", default_value_t = 30)]
    pub interval: u64,

    /// Start Firefox in kiosk (fullscreen) mode.
    #[arg(long, visible_alias = "fullscreen", env = "KIOSK_FULLSCREEN")]
    pub kiosk: bool,

    /// Run Firefox without a visible window.
    #[arg(long, env = "KIOSK_HEADLESS")]
    pub headless: bool,

    /// Window size as WIDTHxHEIGHT.
    #[arg(long, env = "KIOSK_WINDOW_SIZE", value_name = "WxH")]
    pub window_size: Option<String>,

    /// Firefox preference override as key=value. Repeatable.
    #[arg(long = "pref", value_name = "KEY=VALUE")]
    pub prefs: Vec<String>,

    /// Extra Firefox command-line argument. Repeatable.
    #[arg(long = "firefox-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub firefox_args: Vec<String>,

    /// Address of the HTTP control API.
    #[arg(long, env = "KIOSK_HTTP_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: SocketAddr,

    /// MQTT broker host; the listener is disabled when unset.
    #[arg(long, env = "KIOSK_MQTT_HOST")]
    pub mqtt_host: Option<String>,

    /// MQTT broker port.
    #[arg(long, env = "KIOSK_MQTT_PORT", default_value_t = 1883)]
    pub mqtt_port: u16,

    /// Topic carrying control commands.
    #[arg(long, env = "KIOSK_MQTT_TOPIC", default_value = "kiosk/command")]
    pub mqtt_topic: String,

    /// Client ID presented to the broker.
    #[arg(long, env = "KIOSK_MQTT_CLIENT_ID", default_value = "firefox-kiosk")]
    pub mqtt_client_id: String,

    /// Verbose logging.
    #[arg(long, env = "KIOSK_DEBUG")]
    pub debug: bool,
}

impl Config {
    /// Returns the cycle period.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the interval is zero.
    pub fn interval(&self) -> Result<Duration> {
        if self.interval == 0 {
            return Err(Error::config("interval must be at least one second"));
        }
        Ok(Duration::from_secs(self.interval))
    }

    /// Builds the Firefox launch options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a malformed window size or preference.
    pub fn firefox_options(&self) -> Result<FirefoxOptions> {
        let mut options = FirefoxOptions::new();

        if self.kiosk {
            options = options.with_kiosk();
        }
        if self.headless {
            options = options.with_headless();
        }
        if let Some(size) = &self.window_size {
            let (width, height) = parse_window_size(size)?;
            options = options.with_window_size(width, height);
        }

        for pref in &self.prefs {
            options.prefs.push(FirefoxPreference::parse(pref)?);
        }
        for arg in &self.firefox_args {
            options = options.with_arg(arg);
        }

        options.validate()?;
        Ok(options)
    }

    /// Returns the MQTT settings, if a broker is configured.
    #[must_use]
    pub fn mqtt(&self) -> Option<MqttSettings> {
        self.mqtt_host.as_ref().map(|host| MqttSettings {
            host: host.clone(),
            port: self.mqtt_port,
            topic: self.mqtt_topic.clone(),
            client_id: self.mqtt_client_id.clone(),
        })
    }

    /// Returns the default log filter directive.
    #[inline]
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "firefox_kiosk=debug"
        } else {
            "firefox_kiosk=info"
        }
    }
}

/// Parses `WIDTHxHEIGHT`.
fn parse_window_size(size: &str) -> Result<(u32, u32)> {
    let invalid = || Error::config(format!("invalid window size '{size}', expected WIDTHxHEIGHT"));

    let (width, height) = size
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

// ============================================================================
// Tests
// ============================================================================
