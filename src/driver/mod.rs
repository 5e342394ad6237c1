//! Firefox launcher.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Factory for browser windows |
//! | [`DriverBuilder`] | Binary and extension configuration |
//! | [`FirefoxOptions`] | Process command-line options |
//! | [`Profile`] | Temporary profile with `user.js` and the extension |
//! | [`ExtensionSource`] | Where the extension is loaded from |

// ============================================================================
// Submodules
// ============================================================================

/// Bootstrap page passed to Firefox on startup.
pub mod assets;

/// Driver configuration builder.
pub mod builder;

/// Driver implementation.
pub mod core;

/// Firefox command-line options.
pub mod options;

/// Temporary profile management.
pub mod profile;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::DriverBuilder;
pub use core::Driver;
pub use options::FirefoxOptions;
pub use profile::{ExtensionSource, Profile};
