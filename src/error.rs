//! Error types for the kiosk.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use firefox_kiosk::{Result, TabCycleController};
//!
//! async fn example(controller: &TabCycleController) -> Result<()> {
//!     controller.switch_next().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::Profile`], [`Error::FirefoxNotFound`], [`Error::ProcessLaunchFailed`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::Protocol`], [`Error::ElementNotFound`], [`Error::Timeout`], [`Error::RequestTimeout`] |
//! | Script | [`Error::Script`] |
//! | Kiosk | [`Error::TabCreationFailed`], [`Error::ScreenshotFailed`], [`Error::ActivationFailed`], [`Error::UnknownTab`], [`Error::EmptyRegistry`], [`Error::RegistrySealed`], [`Error::DuplicateTab`], [`Error::ImageNotFound`] |
//! | Peripherals | [`Error::Backlight`], [`Error::Mqtt`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Yaml`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::{RequestId, TabId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when command-line or driver configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Profile error.
    ///
    /// Returned when Firefox profile creation or setup fails.
    #[error("Profile error: {message}")]
    Profile {
        /// Description of the profile error.
        message: String,
    },

    /// Firefox binary not found at path.
    #[error("Firefox not found at: {path}")]
    FirefoxNotFound {
        /// Path where Firefox was expected.
        path: PathBuf,
    },

    /// Failed to launch Firefox process.
    #[error("Failed to launch Firefox: {message}")]
    ProcessLaunchFailed {
        /// Description of the launch failure.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection timeout waiting for extension.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or error response from the extension.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Element not found by selector.
    #[error("Element not found: selector={selector}, tab={tab_id}")]
    ElementNotFound {
        /// Selector used.
        selector: String,
        /// Tab where search was performed.
        tab_id: TabId,
    },

    /// Operation timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Command request timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Script Errors
    // ========================================================================
    /// Tab script could not be parsed or validated.
    #[error("Script error: {message}")]
    Script {
        /// Description of the script problem.
        message: String,
    },

    // ========================================================================
    // Kiosk Errors
    // ========================================================================
    /// The driver could not create a tab or run its steps.
    #[error("could not create tab '{name}': {message}")]
    TabCreationFailed {
        /// Display name of the tab.
        name: String,
        /// Underlying driver failure.
        message: String,
    },

    /// Capturing a screenshot failed.
    #[error("could not take screenshot of tab '{tab}': {message}")]
    ScreenshotFailed {
        /// Tab name (startup) or tab ID (switching).
        tab: String,
        /// Underlying driver failure.
        message: String,
    },

    /// Bringing a tab to the foreground failed.
    #[error("could not activate tab {tab_id}: {message}")]
    ActivationFailed {
        /// Tab that was to be activated.
        tab_id: TabId,
        /// Underlying driver failure.
        message: String,
    },

    /// No tab with this identifier exists.
    #[error("could not find a tab with ID {tab_id}")]
    UnknownTab {
        /// Identifier as supplied by the caller.
        tab_id: String,
    },

    /// A switch was requested before any tab was registered.
    #[error("no tabs registered")]
    EmptyRegistry,

    /// A tab was registered after startup completed.
    #[error("tab registry is sealed; tabs can only be added during startup")]
    RegistrySealed,

    /// The driver returned a handle that is already registered.
    #[error("tab {tab_id} is already registered")]
    DuplicateTab {
        /// The duplicate handle.
        tab_id: TabId,
    },

    /// No screenshot has been captured for this tab yet.
    #[error("no image for tab {tab_id}")]
    ImageNotFound {
        /// Identifier as supplied by the caller.
        tab_id: String,
    },

    // ========================================================================
    // Peripheral Errors
    // ========================================================================
    /// Display backlight command failed.
    #[error("Backlight error: {message}")]
    Backlight {
        /// Description of the failure.
        message: String,
    },

    /// MQTT client failure.
    #[error("MQTT error: {message}")]
    Mqtt {
        /// Description of the failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a profile error.
    #[inline]
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile {
            message: message.into(),
        }
    }

    /// Creates a Firefox not found error.
    #[inline]
    pub fn firefox_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FirefoxNotFound { path: path.into() }
    }

    /// Creates a process launch failed error.
    #[inline]
    pub fn process_launch_failed(err: IoError) -> Self {
        Self::ProcessLaunchFailed {
            message: err.to_string(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(selector: impl Into<String>, tab_id: TabId) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
            tab_id,
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a script error.
    #[inline]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Creates a tab creation error.
    #[inline]
    pub fn tab_creation_failed(name: impl Into<String>, cause: &Error) -> Self {
        Self::TabCreationFailed {
            name: name.into(),
            message: cause.to_string(),
        }
    }

    /// Creates a screenshot error.
    #[inline]
    pub fn screenshot_failed(tab: impl ToString, cause: &Error) -> Self {
        Self::ScreenshotFailed {
            tab: tab.to_string(),
            message: cause.to_string(),
        }
    }

    /// Creates an activation error.
    #[inline]
    pub fn activation_failed(tab_id: TabId, cause: &Error) -> Self {
        Self::ActivationFailed {
            tab_id,
            message: cause.to_string(),
        }
    }

    /// Creates an unknown tab error.
    #[inline]
    pub fn unknown_tab(tab_id: impl ToString) -> Self {
        Self::UnknownTab {
            tab_id: tab_id.to_string(),
        }
    }

    /// Creates an image not found error.
    #[inline]
    pub fn image_not_found(tab_id: impl ToString) -> Self {
        Self::ImageNotFound {
            tab_id: tab_id.to_string(),
        }
    }

    /// Creates a backlight error.
    #[inline]
    pub fn backlight(message: impl Into<String>) -> Self {
        Self::Backlight {
            message: message.into(),
        }
    }

    /// Creates an MQTT error.
    #[inline]
    pub fn mqtt(message: impl Into<String>) -> Self {
        Self::Mqtt {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::Timeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if the browser failed while creating, activating or
    /// capturing a tab.
    #[inline]
    #[must_use]
    pub fn is_driver_error(&self) -> bool {
        matches!(
            self,
            Self::TabCreationFailed { .. }
                | Self::ScreenshotFailed { .. }
                | Self::ActivationFailed { .. }
        )
    }

    /// Returns `true` if this error must abort the process when it occurs
    /// before the registry is sealed.
    #[inline]
    #[must_use]
    pub fn is_fatal_at_startup(&self) -> bool {
        self.is_driver_error()
            || self.is_connection_error()
            || matches!(
                self,
                Self::Config { .. }
                    | Self::Profile { .. }
                    | Self::FirefoxNotFound { .. }
                    | Self::ProcessLaunchFailed { .. }
                    | Self::Script { .. }
                    | Self::EmptyRegistry
                    | Self::DuplicateTab { .. }
            )
    }

    /// Returns `true` if the caller asked for something that does not exist.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownTab { .. } | Self::ImageNotFound { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
