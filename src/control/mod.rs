//! Remote control surfaces.
//!
//! Both surfaces drive the same [`TabCycleController`](crate::kiosk::TabCycleController)
//! handle and never touch the browser directly.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `http` | `axum` API, control page and WebSocket status stream |
//! | `mqtt` | Command topic subscription |

// ============================================================================
// Submodules
// ============================================================================

pub mod http;
pub mod mqtt;

// ============================================================================
// Re-exports
// ============================================================================

pub use http::{ApiError, AppState, router};
pub use mqtt::{MqttCommand, MqttSettings};
