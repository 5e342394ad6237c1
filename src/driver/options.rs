//! Firefox command-line options.
//!
//! ```ignore
//! let options = FirefoxOptions::new()
//!     .with_headless()
//!     .with_window_size(1920, 1080);
//!
//! assert_eq!(options.to_args(), ["--headless", "--window-size", "1920,1080"]);
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};

// ============================================================================
// FirefoxOptions
// ============================================================================

/// How the Firefox process is launched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirefoxOptions {
    /// Run without a visible window.
    pub headless: bool,

    /// Viewport size in pixels (width, height).
    ///
    /// Product galleries switch to a mobile layout below ~768px, so the
    /// scraper always sets this.
    pub window_size: Option<(u32, u32)>,

    /// Additional raw command-line arguments.
    pub extra_args: Vec<String>,
}

impl FirefoxOptions {
    /// Creates options with a visible window and Firefox's default size.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headless: false,
            window_size: None,
            extra_args: Vec::new(),
        }
    }

    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Sets the window size in pixels.
    #[inline]
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Appends a raw command-line argument.
    #[inline]
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Converts the options to Firefox command-line arguments.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(3 + self.extra_args.len());

        if self.headless {
            args.push("--headless".to_string());
        }

        if let Some((width, height)) = self.window_size {
            args.push("--window-size".to_string());
            args.push(format!("{width},{height}"));
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Checks the options before launch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero window dimension.
    pub fn validate(&self) -> Result<()> {
        match self.window_size {
            Some((0, _) | (_, 0)) => Err(Error::config(
                "Window dimensions must be greater than zero",
            )),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_default() {
        assert_eq!(FirefoxOptions::new(), FirefoxOptions::default());
        assert!(FirefoxOptions::new().to_args().is_empty());
    }

    #[test]
    fn test_to_args_order() {
        let options = FirefoxOptions::new()
            .with_headless()
            .with_window_size(1920, 1080)
            .with_arg("--safe-mode");

        assert_eq!(
            options.to_args(),
            ["--headless", "--window-size", "1920,1080", "--safe-mode"]
        );
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        assert!(FirefoxOptions::new().with_window_size(0, 600).validate().is_err());
        assert!(FirefoxOptions::new().with_window_size(800, 0).validate().is_err());
        assert!(FirefoxOptions::new().with_window_size(800, 600).validate().is_ok());
        assert!(FirefoxOptions::new().validate().is_ok());
    }
}
