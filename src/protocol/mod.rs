//! WebSocket protocol message types.
//!
//! Messages exchanged between the driver (Rust) and the automation
//! extension running inside Firefox.
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Driver → Extension | Command request |
//! | `Response` | Extension → Driver | Command response |
//!
//! The extension also sends one unsolicited READY response (nil request ID)
//! right after connecting; see [`crate::transport`].

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by module.
pub mod command;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{BrowsingContextCommand, Command, ElementCommand, InputCommand};
pub use request::{
    NO_SUCH_ELEMENT_CODE, Request, Response, ResponseType, STALE_ELEMENT_CODE,
};
