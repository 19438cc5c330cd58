//! Where the automation extension is loaded from.

use std::path::{Path, PathBuf};

// ============================================================================
// ExtensionSource
// ============================================================================

/// Source location for the Firefox extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtensionSource {
    /// Directory containing `manifest.json`.
    Unpacked(PathBuf),
    /// `.xpi` or `.zip` archive.
    Packed(PathBuf),
}

impl ExtensionSource {
    /// Returns the path on disk.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Unpacked(path) | Self::Packed(path) => path,
        }
    }
}

impl From<PathBuf> for ExtensionSource {
    /// Directories are unpacked extensions, anything else an archive.
    fn from(path: PathBuf) -> Self {
        if path.is_dir() {
            Self::Unpacked(path)
        } else {
            Self::Packed(path)
        }
    }
}

impl From<&str> for ExtensionSource {
    fn from(path: &str) -> Self {
        Self::from(PathBuf::from(path))
    }
}

// ============================================================================
// Tests
// ============================================================================
