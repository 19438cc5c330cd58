//! Launches Firefox and hands back a connected [`Window`].
//!
//! # Launch Sequence
//!
//! 1. Bind the WebSocket server on a random localhost port
//! 2. Create a temporary profile, install the extension, write `user.js`
//! 3. Spawn Firefox with the init page as its first URL
//! 4. Wait for the extension's READY handshake
//!
//! # Example
//!
//! ```no_run
//! use firefox_kiosk::Driver;
//!
//! # async fn example() -> firefox_kiosk::Result<()> {
//! let window = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .extension("./extension")
//!     .kiosk()
//!     .build()?
//!     .launch()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::browser::Window;
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::transport::PendingServer;

use super::assets;
use super::builder::DriverBuilder;
use super::options::FirefoxOptions;
use super::profile::{ExtensionSource, Profile};

// ============================================================================
// Types
// ============================================================================

pub(crate) struct DriverInner {
    binary: PathBuf,
    extension: ExtensionSource,
    options: FirefoxOptions,
}

// ============================================================================
// Driver
// ============================================================================

/// Validated launch configuration for the kiosk browser.
#[derive(Clone)]
pub struct Driver {
    pub(crate) inner: Arc<DriverInner>,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("binary", &self.inner.binary)
            .field("extension", &self.inner.extension)
            .field("options", &self.inner.options)
            .finish()
    }
}

impl Driver {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    pub(crate) fn new(binary: PathBuf, extension: ExtensionSource, options: FirefoxOptions) -> Self {
        Self {
            inner: Arc::new(DriverInner {
                binary,
                extension,
                options,
            }),
        }
    }

    /// Returns the launch options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &FirefoxOptions {
        &self.inner.options
    }

    /// Starts Firefox and waits for the extension to connect.
    ///
    /// # Errors
    ///
    /// - [`Error::Profile`] if the profile cannot be prepared
    /// - [`Error::ProcessLaunchFailed`] if Firefox cannot be spawned
    /// - [`Error::ConnectionTimeout`] if the extension never connects
    pub async fn launch(&self) -> Result<Window> {
        let server = PendingServer::bind_localhost().await?;
        let port = server.port();

        let profile = self.prepare_profile()?;

        let session_id = SessionId::next();
        let data_uri = assets::build_init_data_uri(&server.ws_url(), &session_id);

        let child = self.spawn_firefox_process(profile.path(), &data_uri)?;
        info!(pid = child.id(), %session_id, port, "Firefox process spawned");

        let (connection, ready) = server.accept().await?;
        debug!(tab_id = %ready.tab_id, session_id = %ready.session_id, "Extension ready");

        Ok(Window::new(connection, Some(child), Some(profile), port, ready))
    }
}

// ============================================================================
// Driver - Internal
// ============================================================================

impl Driver {
    fn prepare_profile(&self) -> Result<Profile> {
        let profile = Profile::new_temp()?;
        profile.install_extension(&self.inner.extension)?;

        let mut prefs = Profile::kiosk_prefs();
        prefs.extend(self.inner.options.prefs.iter().cloned());
        profile.write_prefs(&prefs)?;

        Ok(profile)
    }

    fn spawn_firefox_process(&self, profile: &Path, data_uri: &str) -> Result<Child> {
        let mut cmd = Command::new(&self.inner.binary);

        cmd.arg("--profile")
            .arg(profile)
            .arg("--no-remote")
            .arg("--new-instance")
            .args(self.inner.options.to_args())
            .arg(data_uri)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        cmd.spawn().map_err(Error::process_launch_failed)
    }
}

// ============================================================================
// Tests
// ============================================================================
