//! Browser handles.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Window`] | Owns the Firefox process, connection and profile |
//! | [`Tab`] | Navigation and element lookup |
//! | [`Element`] | DOM element reference |
//!
//! [`Tab`] and [`Element`] implement [`PageSession`](crate::PageSession)
//! and [`ElementHandle`](crate::ElementHandle), so the scraper runs against
//! a real browser through them.

// ============================================================================
// Submodules
// ============================================================================

/// DOM element handles.
pub mod element;

/// Tab handles.
pub mod tab;

/// Window lifecycle.
pub mod window;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::Element;
pub use tab::Tab;
pub use window::{Window, WindowBuilder};
