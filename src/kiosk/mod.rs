//! Tab rotation.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `controller` | [`TabCycleController`], the serialization point for all switching |
//! | `registry` | Ordered tab handles and next/previous arithmetic |
//! | `images` | Latest screenshot per tab |
//! | `cycle` | Restartable timer task |
//! | `status` | Broadcast of state snapshots |

// ============================================================================
// Submodules
// ============================================================================

pub mod controller;
pub mod cycle;
pub mod images;
pub mod registry;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use controller::TabCycleController;
pub use cycle::SwitchCycle;
pub use images::{Image, ImageStore};
pub use registry::{Direction, TabRegistry};
pub use status::{StatusSink, StatusUpdate};
