//! Builder for [`Driver`] configuration.
//!
//! # Example
//!
//! ```no_run
//! use firefox_kiosk::Driver;
//!
//! # fn example() -> firefox_kiosk::Result<()> {
//! let driver = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .extension("./extension")
//!     .kiosk()
//!     .pref("browser.startup.page", 0)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use crate::error::{Error, Result};

use super::core::Driver;
use super::options::FirefoxOptions;
use super::profile::{ExtensionSource, FirefoxPreference, PreferenceValue};

// ============================================================================
// DriverBuilder
// ============================================================================

/// Builder for a [`Driver`].
///
/// Use [`Driver::builder()`] to create one.
#[derive(Debug, Default, Clone)]
pub struct DriverBuilder {
    binary: Option<PathBuf>,
    extension: Option<ExtensionSource>,
    options: FirefoxOptions,
}

impl DriverBuilder {
    /// Creates a builder with nothing set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Firefox executable.
    #[inline]
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Sets the extension directory or `.xpi` archive.
    #[inline]
    #[must_use]
    pub fn extension(mut self, path: impl Into<PathBuf>) -> Self {
        self.extension = Some(ExtensionSource::from(path.into()));
        self
    }

    /// Replaces all launch options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: FirefoxOptions) -> Self {
        self.options = options;
        self
    }

    /// Launches fullscreen without browser chrome.
    #[inline]
    #[must_use]
    pub fn kiosk(mut self) -> Self {
        self.options.kiosk = true;
        self
    }

    /// Launches without a visible window.
    #[inline]
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.options.headless = true;
        self
    }

    /// Sets the window size in pixels.
    #[inline]
    #[must_use]
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.options.window_size = Some((width, height));
        self
    }

    /// Adds a preference override.
    #[inline]
    #[must_use]
    pub fn pref(mut self, key: impl Into<String>, value: impl Into<PreferenceValue>) -> Self {
        self.options.prefs.push(FirefoxPreference::new(key, value));
        self
    }

    /// Validates the configuration and creates the driver.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the binary or extension is missing, or the
    ///   options are invalid
    /// - [`Error::FirefoxNotFound`] if the binary path doesn't exist
    pub fn build(self) -> Result<Driver> {
        let binary = self.binary.ok_or_else(|| {
            Error::config("Firefox binary path is required; set it with .binary()")
        })?;
        if !binary.exists() {
            return Err(Error::firefox_not_found(&binary));
        }

        let extension = self.extension.ok_or_else(|| {
            Error::config("extension is required; set it with .extension()")
        })?;
        if !extension.path().exists() {
            return Err(Error::config(format!(
                "extension not found at {}",
                extension.path().display()
            )));
        }

        self.options.validate()?;

        Ok(Driver::new(binary, extension, self.options))
    }
}

// ============================================================================
// Tests
// ============================================================================
