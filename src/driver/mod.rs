//! Firefox launch.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Validated launch configuration, `launch()` yields a [`Window`](crate::Window) |
//! | [`DriverBuilder`] | Fluent configuration builder |
//! | [`FirefoxOptions`] | Command-line flags and preference overrides |
//! | [`Profile`] | Temporary profile with extension and `user.js` |

// ============================================================================
// Submodules
// ============================================================================

/// Startup page.
pub mod assets;

/// Fluent builder for driver configuration.
pub mod builder;

/// Process launch.
pub mod core;

/// Firefox launch options.
pub mod options;

/// Firefox profile management.
pub mod profile;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::DriverBuilder;
pub use core::Driver;
pub use options::FirefoxOptions;
pub use profile::{ExtensionSource, FirefoxPreference, PreferenceValue, Profile};
