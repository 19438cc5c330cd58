//! Ordered collection of kiosk tabs.
//!
//! Tabs are appended in creation order while the kiosk starts up. Once
//! [`TabRegistry::seal`] is called the sequence is frozen; navigation is
//! index arithmetic over that fixed order.

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};
use crate::identifiers::TabId;

// ============================================================================
// Direction
// ============================================================================

/// Direction of travel through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the next tab, wrapping from last to first.
    Forward,
    /// Towards the previous tab, wrapping from first to last.
    Backward,
}

// ============================================================================
// TabRegistry
// ============================================================================

/// Append-only, then read-only, sequence of tab handles.
#[derive(Debug, Default)]
pub struct TabRegistry {
    tabs: Vec<TabId>,
    sealed: bool,
}

impl TabRegistry {
    /// Creates an empty, unsealed registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tab at the end of the sequence.
    ///
    /// # Errors
    ///
    /// - [`Error::RegistrySealed`] after [`seal`](Self::seal)
    /// - [`Error::DuplicateTab`] if the handle is already present
    pub fn append(&mut self, tab_id: TabId) -> Result<()> {
        if self.sealed {
            return Err(Error::RegistrySealed);
        }
        if self.tabs.contains(&tab_id) {
            return Err(Error::DuplicateTab { tab_id });
        }
        self.tabs.push(tab_id);
        Ok(())
    }

    /// Freezes the sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRegistry`] if no tab was appended.
    pub fn seal(&mut self) -> Result<()> {
        if self.tabs.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        self.sealed = true;
        Ok(())
    }

    /// Returns `true` once the registry has been sealed.
    #[inline]
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Returns the number of tabs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns `true` if no tab has been appended.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Returns the tabs in creation order.
    #[inline]
    #[must_use]
    pub fn tabs(&self) -> &[TabId] {
        &self.tabs
    }

    /// Returns the tab at `position`, modulo the registry length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRegistry`] if no tab was appended.
    pub fn at(&self, position: usize) -> Result<TabId> {
        if self.tabs.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        Ok(self.tabs[position % self.tabs.len()])
    }

    /// Returns the position of `tab_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTab`] if the handle is not registered.
    pub fn find(&self, tab_id: TabId) -> Result<usize> {
        self.tabs
            .iter()
            .position(|candidate| *candidate == tab_id)
            .ok_or_else(|| Error::unknown_tab(tab_id))
    }

    /// Returns the neighbour of `current` in `direction`.
    ///
    /// An unset `current` resolves to the first tab in either direction.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyRegistry`] if no tab was appended
    /// - [`Error::UnknownTab`] if `current` is not registered
    pub fn next(&self, current: Option<TabId>, direction: Direction) -> Result<TabId> {
        let len = self.tabs.len();
        if len == 0 {
            return Err(Error::EmptyRegistry);
        }

        let Some(current) = current else {
            return self.at(0);
        };

        let position = self.find(current)?;
        let target = match direction {
            Direction::Forward => (position + 1) % len,
            Direction::Backward => (position + len - 1) % len,
        };
        self.at(target)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn tab(id: u32) -> TabId {
        TabId::new(id).unwrap()
    }

    fn registry(ids: &[u32]) -> TabRegistry {
        let mut registry = TabRegistry::new();
        for id in ids {
            registry.append(tab(*id)).unwrap();
        }
        registry
    }

    #[test]
    fn test_empty_registry() {
        let registry = TabRegistry::new();
        assert!(matches!(registry.at(0), Err(Error::EmptyRegistry)));
        assert!(matches!(
            registry.next(None, Direction::Forward),
            Err(Error::EmptyRegistry)
        ));
    }

    #[test]
    fn test_unset_resolves_to_first() {
        let registry = registry(&[4, 5, 6]);
        assert_eq!(registry.next(None, Direction::Forward).unwrap(), tab(4));
        assert_eq!(registry.next(None, Direction::Backward).unwrap(), tab(4));
    }

    #[test]
    fn test_wraps_in_both_directions() {
        let registry = registry(&[1, 2, 3]);
        assert_eq!(registry.next(Some(tab(3)), Direction::Forward).unwrap(), tab(1));
        assert_eq!(registry.next(Some(tab(1)), Direction::Backward).unwrap(), tab(3));
        assert_eq!(registry.next(Some(tab(2)), Direction::Backward).unwrap(), tab(1));
    }

    #[test]
    fn test_backward_does_not_reorder() {
        let registry = registry(&[1, 2, 3]);
        let _ = registry.next(Some(tab(2)), Direction::Backward).unwrap();
        let _ = registry.next(Some(tab(1)), Direction::Backward).unwrap();
        assert_eq!(registry.tabs(), &[tab(1), tab(2), tab(3)]);
    }

    #[test]
    fn test_find_unknown() {
        let registry = registry(&[1]);
        let err = registry.find(tab(9)).unwrap_err();
        assert!(matches!(err, Error::UnknownTab { ref tab_id } if tab_id == "9"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = registry(&[1]);
        assert!(matches!(
            registry.append(tab(1)),
            Err(Error::DuplicateTab { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sealed_rejects_append() {
        let mut registry = registry(&[1]);
        registry.seal().unwrap();
        assert!(registry.is_sealed());
        assert!(matches!(registry.append(tab(2)), Err(Error::RegistrySealed)));
    }

    #[test]
    fn test_seal_requires_tabs() {
        let mut registry = TabRegistry::new();
        assert!(matches!(registry.seal(), Err(Error::EmptyRegistry)));
        assert!(!registry.is_sealed());
    }

    proptest! {
        #[test]
        fn prop_forward_then_backward_returns(len in 1usize..32, start in 0usize..32) {
            let ids: Vec<u32> = (1..=len as u32).collect();
            let registry = registry(&ids);
            let origin = registry.at(start).unwrap();

            let forward = registry.next(Some(origin), Direction::Forward).unwrap();
            let back = registry.next(Some(forward), Direction::Backward).unwrap();
            prop_assert_eq!(back, origin);
        }

        #[test]
        fn prop_full_lap_returns(len in 1usize..16, start in 0usize..16) {
            let ids: Vec<u32> = (1..=len as u32).collect();
            let registry = registry(&ids);
            let origin = registry.at(start).unwrap();

            let mut cursor = origin;
            for _ in 0..len {
                cursor = registry.next(Some(cursor), Direction::Backward).unwrap();
            }
            prop_assert_eq!(cursor, origin);
        }
    }
}
