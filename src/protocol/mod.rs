//! WebSocket protocol message types.
//!
//! This module defines the message format for communication between
//! the kiosk (local end) and the Firefox extension (remote end).
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Local → Remote | Command request |
//! | `Response` | Remote → Local | Command response |
//! | `Event` | Remote → Local | Browser notification |
//!
//! Commands follow `module.methodName` format, e.g.
//! `browsingContext.navigate` or `element.subscribe`.

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by module.
pub mod command;

/// Event message types.
pub mod event;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{BrowsingContextCommand, Command, ElementCommand, InputCommand};
pub use event::{Event, ParsedEvent};
pub use request::{Request, Response, ResponseType};
