//! Browser entities module.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Window`] | Browser window (owns Firefox process + WebSocket) |
//! | [`Tab`] | Browser tab |
//! | [`Action`] | One step of a tab's setup script |
//! | [`By`] | Element locator |
//! | [`BrowserDriver`] | What the controller needs from a browser |
//!
//! # Example
//!
//! ```no_run
//! use firefox_kiosk::{Action, BrowserDriver, By, Driver, Result};
//!
//! # async fn example() -> Result<()> {
//! let window = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .extension("./extension")
//!     .build()?
//!     .launch()
//!     .await?;
//!
//! let tab_id = window
//!     .create_tab(
//!         "dashboard",
//!         &[
//!             Action::Navigate { url: "https://example.com".into() },
//!             Action::WaitVisible { by: By::xpath("//h1") },
//!         ],
//!     )
//!     .await?;
//! let png = window.capture_screenshot(tab_id).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Script actions.
pub mod action;

/// Controller-facing browser trait.
pub mod driver;

/// Element locators.
pub mod selector;

/// Browser tab automation.
pub mod tab;

/// Browser window management.
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use action::Action;
pub use driver::BrowserDriver;
pub use selector::By;
pub use tab::{ImageFormat, Tab};
pub use window::Window;
