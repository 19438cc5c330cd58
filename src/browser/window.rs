//! Browser window management and control.
//!
//! Each [`Window`] owns:
//! - One Firefox process (child process)
//! - One WebSocket connection (unique port)
//! - One profile directory
//!
//! # Example
//!
//! ```no_run
//! use firefox_kiosk::{BrowserDriver, Driver};
//!
//! # async fn example() -> firefox_kiosk::Result<()> {
//! let window = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .extension("./extension")
//!     .kiosk()
//!     .build()?
//!     .launch()
//!     .await?;
//!
//! let tab_id = window.create_tab("status", &[]).await?;
//! window.activate(tab_id).await?;
//!
//! window.close().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::process::Child;
use tracing::{debug, info};

use crate::driver::Profile;
use crate::error::{Error, Result};
use crate::identifiers::{SessionId, TabId};
use crate::protocol::{BrowsingContextCommand, Command, Request};
use crate::transport::{Connection, ReadyData};

use super::{Action, BrowserDriver, ImageFormat, Tab};

// ============================================================================
// ProcessGuard
// ============================================================================

/// Guards a child process and ensures it is killed when dropped.
struct ProcessGuard {
    child: Option<Child>,
    pid: u32,
}

impl ProcessGuard {
    fn new(child: Child) -> Self {
        let pid = child.id().unwrap_or(0);
        debug!(pid, "Process guard created");
        Self {
            child: Some(child),
            pid,
        }
    }

    /// Kills the process and waits for it to exit.
    async fn kill(mut self) {
        if let Some(mut child) = self.child.take() {
            debug!(pid = self.pid, "Killing Firefox process");
            if let Err(e) = child.kill().await {
                debug!(pid = self.pid, error = %e, "Failed to kill process");
            }
            if let Err(e) = child.wait().await {
                debug!(pid = self.pid, error = %e, "Failed to wait for process");
            }
            info!(pid = self.pid, "Process terminated");
        }
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = child.start_kill()
        {
            debug!(pid = self.pid, error = %e, "Failed to send kill signal in Drop");
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a window.
pub(crate) struct WindowInner {
    session_id: SessionId,
    /// Taken on close.
    process: Mutex<Option<ProcessGuard>>,
    connection: Connection,
    /// Kept alive so a temporary profile outlives the process.
    #[allow(dead_code)]
    profile: Option<Profile>,
    port: u16,
    tabs: Mutex<FxHashMap<TabId, Tab>>,
    /// The tab Firefox opened on launch.
    initial_tab_id: TabId,
    /// Set once the initial tab has been handed out by `create_tab`.
    initial_claimed: AtomicBool,
}

// ============================================================================
// Window
// ============================================================================

/// A handle to a Firefox browser window.
///
/// The window owns a Firefox process, WebSocket connection, and profile.
/// When the last handle is dropped, the process is killed.
#[derive(Clone)]
pub struct Window {
    pub(crate) inner: Arc<WindowInner>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("session_id", &self.inner.session_id)
            .field("port", &self.inner.port)
            .field("initial_tab_id", &self.inner.initial_tab_id)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Window - Constructor
// ============================================================================

impl Window {
    /// Creates a new window handle from a completed handshake.
    pub(crate) fn new(
        connection: Connection,
        process: Option<Child>,
        profile: Option<Profile>,
        port: u16,
        ready: ReadyData,
    ) -> Self {
        let initial_tab = Tab::new(ready.tab_id, connection.clone());
        let mut tabs = FxHashMap::default();
        tabs.insert(ready.tab_id, initial_tab);

        debug!(
            session_id = %ready.session_id,
            tab_id = %ready.tab_id,
            port,
            "Window created"
        );

        Self {
            inner: Arc::new(WindowInner {
                session_id: ready.session_id,
                process: Mutex::new(process.map(ProcessGuard::new)),
                connection,
                profile,
                port,
                tabs: Mutex::new(tabs),
                initial_tab_id: ready.tab_id,
                initial_claimed: AtomicBool::new(false),
            }),
        }
    }
}

// ============================================================================
// Window - Accessors
// ============================================================================

impl Window {
    /// Returns the session ID.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.inner.session_id
    }

    /// Returns the WebSocket port for this window.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Returns the Firefox process ID, if the process is still owned.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.inner.process.lock().as_ref().map(|guard| guard.pid)
    }

    /// Returns the number of tabs in this window.
    #[inline]
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.inner.tabs.lock().len()
    }
}

// ============================================================================
// Window - Tab Management
// ============================================================================

impl Window {
    /// Returns the handle for a known tab.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTab`] if this window never opened `tab_id`.
    pub fn tab(&self, tab_id: TabId) -> Result<Tab> {
        self.inner
            .tabs
            .lock()
            .get(&tab_id)
            .cloned()
            .ok_or_else(|| Error::unknown_tab(tab_id))
    }

    /// Opens a new tab in this window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the response carries no usable tab ID.
    pub async fn new_tab(&self) -> Result<Tab> {
        let command = Command::BrowsingContext(BrowsingContextCommand::NewTab);
        let request = Request::new(self.inner.initial_tab_id, command);
        let response = self.inner.connection.send(request).await?;

        let raw = response
            .get_u64("tabId")
            .ok_or_else(|| Error::protocol("Expected tabId in NewTab response"))?;

        let tab_id = u32::try_from(raw)
            .ok()
            .and_then(TabId::new)
            .ok_or_else(|| Error::protocol(format!("Invalid tabId in NewTab response: {raw}")))?;

        let tab = Tab::new(tab_id, self.inner.connection.clone());
        self.inner.tabs.lock().insert(tab_id, tab.clone());

        debug!(session_id = %self.inner.session_id, %tab_id, "New tab created");
        Ok(tab)
    }

    /// Returns the initial tab the first time, a fresh tab afterwards.
    async fn claim_tab(&self) -> Result<Tab> {
        if !self.inner.initial_claimed.swap(true, Ordering::SeqCst) {
            return self.tab(self.inner.initial_tab_id);
        }
        self.new_tab().await
    }
}

// ============================================================================
// Window - Lifecycle
// ============================================================================

impl Window {
    /// Closes the connection and kills the Firefox process.
    ///
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        debug!(session_id = %self.inner.session_id, "Closing window");
        self.inner.connection.shutdown();

        let guard = self.inner.process.lock().take();
        if let Some(guard) = guard {
            guard.kill().await;
        }

        info!(session_id = %self.inner.session_id, "Window closed");
    }
}

// ============================================================================
// Window - BrowserDriver
// ============================================================================

#[async_trait]
impl BrowserDriver for Window {
    async fn create_tab(&self, name: &str, actions: &[Action]) -> Result<TabId> {
        let tab = self.claim_tab().await?;
        debug!(name, tab_id = %tab.tab_id(), actions = actions.len(), "Preparing tab");
        tab.run(actions).await?;
        Ok(tab.tab_id())
    }

    async fn activate(&self, tab_id: TabId) -> Result<()> {
        self.tab(tab_id)?.focus().await
    }

    async fn capture_screenshot(&self, tab_id: TabId) -> Result<Vec<u8>> {
        self.tab(tab_id)?.capture_screenshot(ImageFormat::Png).await
    }

    async fn close(&self) -> Result<()> {
        self.shutdown().await;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::browser::By;
    use crate::browser::testing::{FakeExtension, INITIAL_TAB};

    async fn window() -> (FakeExtension, Window) {
        let (extension, connection, ready) = FakeExtension::start().await;
        let window = Window::new(connection, None, None, 0, ready);
        (extension, window)
    }

    #[test]
    fn test_window_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Window>();
    }

    #[tokio::test]
    async fn test_first_tab_reuses_initial_tab() {
        let (extension, window) = window().await;

        let first = window.create_tab("first", &[]).await.unwrap();
        let second = window.create_tab("second", &[]).await.unwrap();

        assert_eq!(first.as_u32(), INITIAL_TAB);
        assert_eq!(second.as_u32(), INITIAL_TAB + 1);
        assert_eq!(window.tab_count(), 2);
        assert_eq!(extension.methods(), vec!["browsingContext.newTab"]);
    }

    #[tokio::test]
    async fn test_create_tab_runs_actions_in_that_tab() {
        let (extension, window) = window().await;
        window.create_tab("first", &[]).await.unwrap();

        let tab_id = window
            .create_tab(
                "dashboard",
                &[
                    Action::Navigate {
                        url: "https://dash.example/".to_string(),
                    },
                    Action::Click {
                        by: By::xpath("//button"),
                    },
                ],
            )
            .await
            .unwrap();

        let calls = extension.calls();
        assert!(
            calls[1..]
                .iter()
                .all(|(_, tab)| *tab == tab_id.as_u32())
        );
    }

    #[tokio::test]
    async fn test_activate_focuses_tab_then_window() {
        let (extension, window) = window().await;
        let tab_id = window.create_tab("only", &[]).await.unwrap();

        window.activate(tab_id).await.unwrap();

        assert_eq!(
            extension.methods(),
            vec!["browsingContext.focusTab", "browsingContext.focusWindow"]
        );
    }

    #[tokio::test]
    async fn test_capture_returns_decoded_bytes() {
        let (_extension, window) = window().await;
        let tab_id = window.create_tab("only", &[]).await.unwrap();

        let bytes = window.capture_screenshot(tab_id).await.unwrap();
        assert_eq!(bytes, format!("tab{INITIAL_TAB}-shot1").into_bytes());
    }

    #[tokio::test]
    async fn test_unknown_tab_is_rejected() {
        let (_extension, window) = window().await;
        let missing = TabId::new(99).unwrap();

        assert!(matches!(
            window.activate(missing).await,
            Err(Error::UnknownTab { .. })
        ));
    }

    #[tokio::test]
    async fn test_close_is_repeatable() {
        let (_extension, window) = window().await;
        window.close().await.unwrap();
        window.close().await.unwrap();
        assert_eq!(window.pid(), None);
    }
}
