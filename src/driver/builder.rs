//! Fluent configuration for [`Driver`].
//!
//! ```no_run
//! use product_scraper::Driver;
//!
//! # fn example() -> product_scraper::Result<()> {
//! let driver = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .extension("./extension")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

use super::core::Driver;
use super::profile::ExtensionSource;

// ============================================================================
// Constants
// ============================================================================

/// Executable looked up on `PATH` when no binary is configured.
const DEFAULT_BINARY_NAME: &str = "firefox";

// ============================================================================
// DriverBuilder
// ============================================================================

/// Builder for a [`Driver`]. Created by [`Driver::builder()`].
#[derive(Debug, Default, Clone)]
pub struct DriverBuilder {
    binary: Option<PathBuf>,
    extension: Option<ExtensionSource>,
}

impl DriverBuilder {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Firefox executable.
    ///
    /// When unset, `firefox` is searched for on `PATH`.
    #[inline]
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Sets the extension from a path: directories are unpacked, files are
    /// treated as `.xpi` archives.
    #[inline]
    #[must_use]
    pub fn extension(mut self, path: impl Into<PathBuf>) -> Self {
        self.extension = Some(ExtensionSource::from(path.into()));
        self
    }

    /// Sets the extension from base64-encoded `.xpi` bytes.
    #[inline]
    #[must_use]
    pub fn extension_base64(mut self, data: impl Into<String>) -> Self {
        self.extension = Some(ExtensionSource::base64(data));
        self
    }

    /// Sets the extension source directly.
    #[inline]
    #[must_use]
    pub fn extension_source(mut self, source: ExtensionSource) -> Self {
        self.extension = Some(source);
        self
    }

    /// Validates the configuration and builds the driver.
    ///
    /// # Errors
    ///
    /// - [`Error::FirefoxNotFound`] if the binary does not exist
    /// - [`Error::Config`] if no extension is set or its path is missing
    pub fn build(self) -> Result<Driver> {
        let binary = self.resolve_binary()?;
        let extension = self.validate_extension()?;

        debug!(binary = %binary.display(), "Driver configured");

        Ok(Driver::new(binary, extension))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DriverBuilder {
    fn resolve_binary(&self) -> Result<PathBuf> {
        match &self.binary {
            Some(binary) if binary.exists() => Ok(binary.clone()),
            Some(binary) => Err(Error::firefox_not_found(binary)),
            None => find_on_path(DEFAULT_BINARY_NAME)
                .ok_or_else(|| Error::firefox_not_found(DEFAULT_BINARY_NAME)),
        }
    }

    fn validate_extension(&self) -> Result<ExtensionSource> {
        let extension = self.extension.clone().ok_or_else(|| {
            Error::config(
                "Automation extension is required. Use .extension() or .extension_base64().",
            )
        })?;

        if let Some(path) = extension.path()
            && !path.exists()
        {
            return Err(Error::config(format!(
                "Extension not found at: {}",
                path.display()
            )));
        }

        Ok(extension)
    }
}

/// Searches `PATH` for an executable file named `name`.
fn find_on_path(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name.as_ref()))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_sets_path() {
        let builder = DriverBuilder::new().binary("/usr/bin/firefox");
        assert_eq!(builder.binary, Some(PathBuf::from("/usr/bin/firefox")));
    }

    #[test]
    fn test_extension_base64_sets_source() {
        let builder = DriverBuilder::new().extension_base64("UEsDBBQ=");
        assert_eq!(builder.extension, Some(ExtensionSource::base64("UEsDBBQ=")));
    }

    #[test]
    fn test_build_fails_with_missing_binary() {
        let err = DriverBuilder::new()
            .binary("/nonexistent/firefox")
            .extension_base64("data")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::FirefoxNotFound { .. }));
    }

    #[test]
    fn test_build_fails_without_extension() {
        let binary = tempfile::NamedTempFile::new().expect("temp file");
        let err = DriverBuilder::new()
            .binary(binary.path())
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("extension"));
    }

    #[test]
    fn test_build_fails_with_missing_extension_path() {
        let binary = tempfile::NamedTempFile::new().expect("temp file");
        let err = DriverBuilder::new()
            .binary(binary.path())
            .extension_source(ExtensionSource::packed("/nonexistent/ext.xpi"))
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_build_succeeds_with_existing_paths() {
        let binary = tempfile::NamedTempFile::new().expect("temp file");
        let driver = DriverBuilder::new()
            .binary(binary.path())
            .extension_base64("UEsDBBQ=")
            .build()
            .expect("build");

        assert_eq!(driver.binary(), binary.path());
    }
}
