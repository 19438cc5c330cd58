//! WebSocket transport layer.
//!
//! This module handles communication between the kiosk and the Firefox
//! extension via WebSocket.
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Window (Rust)  │         WebSocket            │  Extension      │
//! │  PendingServer  │◄────────────────────────────►│  (Background)   │
//! │  → Connection   │      localhost:PORT          │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `server` | WebSocket server binding and acceptance |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// WebSocket server for Firefox communication.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, EventHandler, HandlerId, ReadyData};
pub use server::PendingServer;
