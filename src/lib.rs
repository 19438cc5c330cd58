//! Firefox kiosk - scripted tabs on a display, cycled on a timer.
//!
//! The kiosk launches Firefox with a control extension, prepares one tab per
//! entry of a YAML script (log in, open a dashboard), then rotates through
//! the tabs. An HTTP API and an MQTT topic can pause, resume or switch at
//! any time.
//!
//! # Architecture
//!
//! - **Browser (Rust side)**: [`Driver`] launches Firefox; the [`Window`] it
//!   returns implements [`BrowserDriver`] over the extension's WebSocket.
//! - **Core**: [`TabCycleController`] owns the tab registry, the screenshot
//!   cache and the switch cycle. Every switch goes through it, whether it
//!   came from the timer, HTTP or MQTT.
//! - **Control**: [`control::http`] and [`control::mqtt`] translate requests
//!   into controller calls.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use firefox_kiosk::{Driver, Result, TabCycleController, script};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let tabs = script::parse("- name: Clock\n  script:\n    - go: https://time.is\n")?;
//!
//!     let window = Driver::builder()
//!         .binary("/usr/bin/firefox")
//!         .extension("/opt/kiosk/extension")
//!         .kiosk()
//!         .build()?
//!         .launch()
//!         .await?;
//!
//!     let controller = TabCycleController::new(Arc::new(window));
//!     for tab in &tabs {
//!         controller.register_tab(tab).await?;
//!     }
//!     controller.finish_startup().await?;
//!     controller.start_cycling(Duration::from_secs(30)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`kiosk`] | [`TabCycleController`] and its parts |
//! | [`browser`] | [`BrowserDriver`], [`Window`], [`Tab`] |
//! | [`driver`] | Firefox launch and profile setup |
//! | [`script`] | YAML tab scripts |
//! | [`control`] | HTTP and MQTT control surfaces |
//! | [`backlight`] | Display power via VideoCore tools |
//! | [`config`] | Command-line configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | WebSocket message types (internal) |
//! | [`transport`] | WebSocket transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Display backlight control.
pub mod backlight;

/// Browser entities: Window, Tab and the driver seam.
///
/// - [`Window`] - Browser window (owns the Firefox process)
/// - [`Tab`] - One browser tab
/// - [`BrowserDriver`] - What the controller needs from a browser
pub mod browser;

/// Command-line configuration.
pub mod config;

/// HTTP and MQTT control surfaces.
pub mod control;

/// Firefox launcher and configuration.
///
/// Use [`Driver::builder()`] to create a configured driver instance.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for browser entities.
pub mod identifiers;

/// Tab rotation core.
pub mod kiosk;

/// WebSocket protocol message types.
///
/// Internal module defining command/response/event structures.
pub mod protocol;

/// Tab script format.
pub mod script;

/// WebSocket transport layer.
///
/// Internal module handling WebSocket server and connection management.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{Action, BrowserDriver, By, Tab, Window};

// Driver types
pub use driver::{Driver, DriverBuilder, ExtensionSource, FirefoxOptions, Profile};

// Kiosk types
pub use kiosk::{Image, StatusUpdate, TabCycleController};

// Script types
pub use script::TabDefinition;

// Backlight types
pub use backlight::{Backlight, DisplayStatus, VideoCore};

// Configuration
pub use config::Config;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ElementId, FrameId, RequestId, SessionId, TabId};
