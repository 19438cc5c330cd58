//! Firefox launch options.
//!
//! # Example
//!
//! ```
//! use firefox_kiosk::FirefoxOptions;
//!
//! let options = FirefoxOptions::new()
//!     .with_kiosk()
//!     .with_window_size(1920, 1080)
//!     .with_pref("layout.css.devPixelsPerPx", "1.5");
//!
//! assert_eq!(options.to_args(), ["--window-size", "1920,1080", "--kiosk"]);
//! ```

use crate::error::{Error, Result};

use super::profile::{FirefoxPreference, PreferenceValue};

// ============================================================================
// FirefoxOptions
// ============================================================================

/// How Firefox is launched for the kiosk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirefoxOptions {
    /// Run without a visible window.
    pub headless: bool,

    /// Window dimensions in pixels (width, height).
    pub window_size: Option<(u32, u32)>,

    /// Fullscreen with browser chrome hidden.
    pub kiosk: bool,

    /// Extra command-line arguments, passed through verbatim.
    pub extra_args: Vec<String>,

    /// Preferences written after the kiosk defaults.
    pub prefs: Vec<FirefoxPreference>,
}

impl FirefoxOptions {
    /// Creates options with everything off.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Sets the window size in pixels.
    #[inline]
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Enables kiosk mode.
    #[inline]
    #[must_use]
    pub fn with_kiosk(mut self) -> Self {
        self.kiosk = true;
        self
    }

    /// Adds a raw command-line argument.
    #[inline]
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Adds a preference override.
    #[inline]
    #[must_use]
    pub fn with_pref(mut self, key: impl Into<String>, value: impl Into<PreferenceValue>) -> Self {
        self.prefs.push(FirefoxPreference::new(key, value));
        self
    }

    /// Converts the options to Firefox command-line arguments.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(4 + self.extra_args.len());

        if self.headless {
            args.push("--headless".to_string());
        }

        if let Some((width, height)) = self.window_size {
            args.push("--window-size".to_string());
            args.push(format!("{width},{height}"));
        }

        if self.kiosk {
            args.push("--kiosk".to_string());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Checks the options for values Firefox would reject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero window dimension.
    pub fn validate(&self) -> Result<()> {
        if let Some((width, height)) = self.window_size
            && (width == 0 || height == 0)
        {
            return Err(Error::config(format!(
                "window size {width}x{height} must be greater than zero in both dimensions"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_args() {
        assert!(FirefoxOptions::new().to_args().is_empty());
    }

    #[test]
    fn test_args_order() {
        let options = FirefoxOptions::new()
            .with_headless()
            .with_window_size(800, 480)
            .with_kiosk()
            .with_arg("--safe-mode");

        assert_eq!(
            options.to_args(),
            ["--headless", "--window-size", "800,480", "--kiosk", "--safe-mode"]
        );
    }

    #[test]
    fn test_prefs_do_not_become_args() {
        let options = FirefoxOptions::new().with_pref("browser.startup.page", 1);
        assert!(options.to_args().is_empty());
        assert_eq!(options.prefs.len(), 1);
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        assert!(FirefoxOptions::new().with_window_size(800, 480).validate().is_ok());
        assert!(matches!(
            FirefoxOptions::new().with_window_size(0, 480).validate(),
            Err(Error::Config { .. })
        ));
    }
}
