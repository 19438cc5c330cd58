//! Firefox profile for a kiosk session.
//!
//! A [`Profile`] is a temporary directory holding:
//!
//! - `user.js` with the kiosk preferences plus any user overrides
//! - `extensions/<gecko id>/` with the automation extension
//!
//! The directory is deleted when the profile is dropped.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};

// ============================================================================
// Submodules
// ============================================================================

/// Extension source locations.
pub mod extensions;

/// `user.js` preferences.
pub mod preferences;

// ============================================================================
// Re-exports
// ============================================================================

pub use extensions::ExtensionSource;
pub use preferences::{FirefoxPreference, PreferenceValue};

// ============================================================================
// Constants
// ============================================================================

const USER_JS_HEADER: &str = "// Generated by firefox-kiosk\n\n";

// ============================================================================
// Profile
// ============================================================================

/// A temporary Firefox profile directory.
pub struct Profile {
    /// Keeps the directory alive.
    _temp_dir: TempDir,
    path: PathBuf,
}

impl Profile {
    /// Creates an empty profile under the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the directory cannot be created.
    pub fn new_temp() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("firefox-kiosk-")
            .map_err(|e| Error::profile(format!("Failed to create temp profile: {e}")))?;

        let path = temp_dir.path().to_path_buf();
        debug!(path = %path.display(), "Created temporary profile");

        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// Returns the profile directory.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ============================================================================
// Profile - Preferences
// ============================================================================

impl Profile {
    /// Writes `prefs` to `user.js`, replacing any previous content.
    ///
    /// Later entries win when a key repeats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the file cannot be written.
    pub fn write_prefs(&self, prefs: &[FirefoxPreference]) -> Result<()> {
        let file_path = self.path.join("user.js");

        let mut content = String::from(USER_JS_HEADER);
        for pref in prefs {
            content.push_str(&pref.to_user_pref_line());
            content.push('\n');
        }

        fs::write(&file_path, content).map_err(|e| {
            Error::profile(format!(
                "Failed to write user.js at {}: {e}",
                file_path.display()
            ))
        })?;

        debug!(path = %file_path.display(), pref_count = prefs.len(), "Wrote user.js");
        Ok(())
    }

    /// Preferences for an unattended display.
    ///
    /// Loads the unsigned extension, skips every first-run and restore page,
    /// silences update and telemetry traffic, and keeps prompts off screen.
    #[must_use]
    pub fn kiosk_prefs() -> Vec<FirefoxPreference> {
        use preferences::FirefoxPreference as Pref;

        vec![
            // Extension
            Pref::new("xpinstall.signatures.required", false),
            Pref::new("extensions.autoDisableScopes", 0),
            Pref::new("extensions.enabledScopes", 5),
            // Startup
            Pref::new("browser.startup.page", 0),
            Pref::new("browser.startup.homepage_override.mstone", "ignore"),
            Pref::new("startup.homepage_welcome_url", ""),
            Pref::new("browser.shell.checkDefaultBrowser", false),
            Pref::new("browser.aboutwelcome.enabled", false),
            Pref::new("trailhead.firstrun.didSeeAboutWelcome", true),
            Pref::new("browser.sessionstore.resume_from_crash", false),
            Pref::new("toolkit.startup.max_resumed_crashes", -1),
            Pref::new("browser.disableResetPrompt", true),
            // Prompts and overlays
            Pref::new("browser.tabs.warnOnClose", false),
            Pref::new("browser.warnOnQuit", false),
            Pref::new("full-screen-api.warning.timeout", 0),
            Pref::new("full-screen-api.transition-duration.enter", "0 0"),
            Pref::new("browser.translations.automaticallyPopup", false),
            Pref::new("browser.uitour.enabled", false),
            Pref::new("dom.disable_beforeunload", true),
            Pref::new("signon.rememberSignons", false),
            Pref::new("media.autoplay.default", 0),
            // Updates and telemetry
            Pref::new("app.update.auto", false),
            Pref::new("app.update.staging.enabled", false),
            Pref::new("extensions.update.enabled", false),
            Pref::new("app.normandy.enabled", false),
            Pref::new("toolkit.telemetry.enabled", false),
            Pref::new("toolkit.telemetry.unified", false),
            Pref::new("datareporting.healthreport.uploadEnabled", false),
            Pref::new("datareporting.policy.dataSubmissionEnabled", false),
        ]
    }
}

// ============================================================================
// Profile - Extensions
// ============================================================================

impl Profile {
    /// Installs the extension into `extensions/<gecko id>/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the archive or manifest is unusable, and
    /// [`Error::Io`] if copying fails.
    pub fn install_extension(&self, source: &ExtensionSource) -> Result<()> {
        match source {
            ExtensionSource::Unpacked(path) => self.install_unpacked(path),
            ExtensionSource::Packed(path) => {
                let file = fs::File::open(path)?;
                let mut archive = ZipArchive::new(file)
                    .map_err(|e| Error::profile(format!("Invalid extension archive: {e}")))?;

                let extracted = TempDir::new()?;
                archive
                    .extract(extracted.path())
                    .map_err(|e| Error::profile(format!("Failed to extract extension: {e}")))?;

                self.install_unpacked(extracted.path())
            }
        }
    }

    fn install_unpacked(&self, src: &Path) -> Result<()> {
        let extension_id = read_manifest_id(src)?;
        let dest = self.path.join("extensions").join(&extension_id);

        copy_dir_recursive(src, &dest)?;

        debug!(%extension_id, dest = %dest.display(), "Installed extension");
        Ok(())
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

/// Reads the gecko ID from `manifest.json`.
fn read_manifest_id(dir: &Path) -> Result<String> {
    let manifest_path = dir.join("manifest.json");
    let content = fs::read_to_string(&manifest_path).map_err(|e| {
        Error::profile(format!(
            "Extension manifest not found at {}: {e}",
            manifest_path.display()
        ))
    })?;

    let json: Value = serde_json::from_str(&content)
        .map_err(|e| Error::profile(format!("Invalid manifest.json: {e}")))?;

    ["/browser_specific_settings/gecko/id", "/applications/gecko/id"]
        .iter()
        .find_map(|pointer| json.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| Error::profile("Extension manifest missing 'gecko.id' field"))
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dst_path = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &dst_path)?;
        } else {
            fs::copy(entry.path(), &dst_path)?;
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
