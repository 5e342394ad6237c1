//! Where the automation extension comes from.
//!
//! | Variant | Source |
//! |---------|--------|
//! | [`ExtensionSource::Unpacked`] | Directory containing `manifest.json` |
//! | [`ExtensionSource::Packed`] | `.xpi` / `.zip` archive |
//! | [`ExtensionSource::Base64`] | Base64-encoded `.xpi` bytes |

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

// ============================================================================
// ExtensionSource
// ============================================================================

/// Source of the automation extension installed into each profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionSource {
    /// Unpacked extension directory.
    Unpacked(PathBuf),
    /// Packed extension archive.
    Packed(PathBuf),
    /// Base64-encoded archive contents.
    Base64(String),
}

impl ExtensionSource {
    /// Unpacked extension directory.
    #[inline]
    #[must_use]
    pub fn unpacked(path: impl Into<PathBuf>) -> Self {
        Self::Unpacked(path.into())
    }

    /// Packed `.xpi` archive.
    #[inline]
    #[must_use]
    pub fn packed(path: impl Into<PathBuf>) -> Self {
        Self::Packed(path.into())
    }

    /// Base64-encoded `.xpi` contents.
    #[inline]
    #[must_use]
    pub fn base64(data: impl Into<String>) -> Self {
        Self::Base64(data.into())
    }

    /// Returns the filesystem path, if this source has one.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Unpacked(path) | Self::Packed(path) => Some(path),
            Self::Base64(_) => None,
        }
    }
}

impl From<PathBuf> for ExtensionSource {
    /// Directories are unpacked extensions; anything else is an archive.
    fn from(path: PathBuf) -> Self {
        if path.is_dir() {
            Self::Unpacked(path)
        } else {
            Self::Packed(path)
        }
    }
}

impl From<&Path> for ExtensionSource {
    fn from(path: &Path) -> Self {
        Self::from(path.to_path_buf())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_directory_is_unpacked() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = ExtensionSource::from(dir.path());
        assert_eq!(source, ExtensionSource::unpacked(dir.path()));
    }

    #[test]
    fn test_from_file_path_is_packed() {
        let source = ExtensionSource::from(PathBuf::from("./missing-extension.xpi"));
        assert_eq!(source, ExtensionSource::packed("./missing-extension.xpi"));
    }

    #[test]
    fn test_base64_has_no_path() {
        assert!(ExtensionSource::base64("UEsDBBQ=").path().is_none());
        assert_eq!(
            ExtensionSource::packed("ext.xpi").path(),
            Some(Path::new("ext.xpi"))
        );
    }
}
