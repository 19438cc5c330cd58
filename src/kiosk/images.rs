//! Latest screenshot per tab.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::identifiers::TabId;

// ============================================================================
// Image
// ============================================================================

/// A captured screenshot and the tab it depicts.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    tab_id: TabId,
    data: Arc<[u8]>,
}

impl Image {
    /// Wraps captured bytes.
    #[must_use]
    pub fn new(tab_id: TabId, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            tab_id,
            data: data.into(),
        }
    }

    /// Returns the tab this image depicts.
    #[inline]
    #[must_use]
    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    /// Returns the encoded image bytes.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

// ============================================================================
// ImageStore
// ============================================================================

/// Concurrent map from tab to its most recent [`Image`].
///
/// Entries are replaced wholesale and never removed.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: RwLock<FxHashMap<TabId, Image>>,
}

impl ImageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` as the image for `tab_id`, replacing any previous one.
    pub fn put(&self, tab_id: TabId, data: Vec<u8>) {
        let image = Image::new(tab_id, data);
        self.images.write().insert(tab_id, image);
    }

    /// Returns the image for `tab_id`, if one was captured.
    #[must_use]
    pub fn get(&self, tab_id: TabId) -> Option<Image> {
        self.images.read().get(&tab_id).cloned()
    }

    /// Returns the tabs that have an image, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<TabId> {
        self.images.read().keys().copied().collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
