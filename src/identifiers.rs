//! Type-safe identifiers for browser entities.
//!
//! Newtype wrappers keep tab, session, request and element identifiers
//! from being mixed up at compile time.
//!
//! | Type | Inner | Assigned by |
//! |------|-------|-------------|
//! | [`TabId`] | `NonZeroU32` | Firefox (`browser.tabs`) |
//! | [`FrameId`] | `u64` | Firefox (`0` = main frame) |
//! | [`SessionId`] | `NonZeroU32` | Local process counter |
//! | [`RequestId`] | `Uuid` | Local end, per request |
//! | [`ElementId`] | `String` | Extension content script |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// ============================================================================
// TabId
// ============================================================================

/// Identifier of a browser tab, assigned by Firefox when the tab is created.
///
/// This is the handle the kiosk uses as registry key and image key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(NonZeroU32);

impl TabId {
    /// Creates a tab ID, returning `None` for zero.
    #[inline]
    #[must_use]
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TabId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or(())
    }
}

impl Serialize for TabId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0.get())
    }
}

impl<'de> Deserialize<'de> for TabId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Self::new(raw).ok_or_else(|| serde::de::Error::custom("tab id must be non-zero"))
    }
}

// ============================================================================
// FrameId
// ============================================================================

/// Identifier of a frame inside a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(u64);

impl FrameId {
    /// The top-level frame of a tab.
    #[inline]
    #[must_use]
    pub const fn main() -> Self {
        Self(0)
    }

    /// Returns `true` for the top-level frame.
    #[inline]
    #[must_use]
    pub const fn is_main(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SessionId
// ============================================================================

/// Process-wide counter backing [`SessionId::next`].
static NEXT_SESSION_ID: AtomicU32 = AtomicU32::new(1);

/// Identifier of one browser session (one Firefox process).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(NonZeroU32);

impl SessionId {
    /// Allocates the next unused session ID.
    #[must_use]
    pub fn next() -> Self {
        loop {
            let raw = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
            if let Some(id) = NonZeroU32::new(raw) {
                return Self(id);
            }
        }
    }

    /// Wraps a raw value received from the extension.
    #[inline]
    #[must_use]
    pub fn from_u32(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// RequestId
// ============================================================================

/// Correlates a request with its response.
///
/// The nil UUID is reserved for the READY handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh random request ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The ID the extension uses for its READY message.
    #[inline]
    #[must_use]
    pub const fn ready() -> Self {
        Self(Uuid::nil())
    }

    /// Returns `true` for the READY handshake ID.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ElementId
// ============================================================================

/// Reference to a DOM element held by the extension's content script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Wraps an element reference.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reference as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_id_rejects_zero() {
        assert!(TabId::new(0).is_none());
        assert_eq!(TabId::new(7).map(|id| id.as_u32()), Some(7));
    }

    #[test]
    fn test_tab_id_from_str() {
        assert_eq!("12".parse::<TabId>(), Ok(TabId::new(12).unwrap()));
        assert!("0".parse::<TabId>().is_err());
        assert!("abc".parse::<TabId>().is_err());
    }

    #[test]
    fn test_tab_id_serializes_as_number() {
        let id = TabId::new(3).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        let back: TabId = serde_json::from_str("3").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<TabId>("0").is_err());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionId::next();
        let b = SessionId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ready_request_id() {
        assert!(RequestId::ready().is_ready());
        assert!(!RequestId::generate().is_ready());
    }
}
