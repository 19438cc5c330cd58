//! Browser tab automation and control.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Tab struct and accessors |
//! | `navigation` | URL navigation, focus |
//! | `elements` | Element waiting, clicking, typing |
//! | `actions` | Running script actions |
//! | `screenshot` | Visible-area screenshots |
//!
//! # Example
//!
//! ```ignore
//! let tab = window.tab(tab_id)?;
//!
//! tab.goto("https://example.com").await?;
//! tab.click(&By::xpath("//button[@type='submit']")).await?;
//! let png = tab.capture_screenshot(ImageFormat::Png).await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod actions;
mod core;
mod elements;
mod navigation;
mod screenshot;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Tab;
pub use screenshot::ImageFormat;
