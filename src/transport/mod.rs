//! WebSocket transport between the scraper and the Firefox extension.
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Window (Rust)  │         WebSocket            │  Extension      │
//! │  PendingServer  │◄────────────────────────────►│  (Background)   │
//! │  → Connection   │      127.0.0.1:PORT          │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Socket event loop and request/response correlation |
//! | `server` | Binding and accepting the extension's connection |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// Loopback listener.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ReadyData};
pub use server::PendingServer;
