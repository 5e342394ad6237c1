//! Request and Response message types.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::{FrameId, RequestId, TabId};

use super::Command;

// ============================================================================
// Constants
// ============================================================================

/// Error code the extension reports for a handle whose node left the DOM.
pub const STALE_ELEMENT_CODE: &str = "stale element reference";

/// Error code the extension reports when a lookup matches nothing.
pub const NO_SUCH_ELEMENT_CODE: &str = "no such element";

// ============================================================================
// Request
// ============================================================================

/// A command request from the driver to the extension.
///
/// # Format
///
/// ```json
/// {
///   "id": "uuid",
///   "method": "module.methodName",
///   "tabId": 1,
///   "frameId": 0,
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Unique identifier for request/response correlation.
    pub id: RequestId,

    /// Target tab ID.
    #[serde(rename = "tabId")]
    pub tab_id: TabId,

    /// Target frame ID (0 = main frame).
    #[serde(rename = "frameId")]
    pub frame_id: FrameId,

    /// Command with method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a new request with auto-generated ID.
    #[inline]
    #[must_use]
    pub fn new(tab_id: TabId, frame_id: FrameId, command: Command) -> Self {
        Self {
            id: RequestId::generate(),
            tab_id,
            frame_id,
            command,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from the extension.
///
/// Success:
/// ```json
/// { "id": "uuid", "type": "success", "result": { ... } }
/// ```
///
/// Error:
/// ```json
/// { "id": "uuid", "type": "error", "error": "no such element", "message": "..." }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Response type.
    #[serde(rename = "type")]
    pub response_type: ResponseType,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error code (if error).
    #[serde(default)]
    pub error: Option<String>,

    /// Error message (if error).
    #[serde(default)]
    pub message: Option<String>,
}

impl Response {
    /// Returns `true` if this is a success response.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_type == ResponseType::Success
    }

    /// Returns the error code if this is an error response.
    #[inline]
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self.response_type {
            ResponseType::Error => Some(self.error.as_deref().unwrap_or("unknown error")),
            ResponseType::Success => None,
        }
    }

    /// Extracts the result value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] carrying the extension's code and message
    /// if the response was an error.
    pub fn into_result(self) -> Result<Value> {
        match self.response_type {
            ResponseType::Success => Ok(self.result.unwrap_or(Value::Null)),
            ResponseType::Error => {
                let code = self.error.unwrap_or_else(|| "unknown error".to_string());
                let message = self.message.unwrap_or_else(|| code.clone());
                Err(Error::remote(code, message))
            }
        }
    }

    /// Gets a string value from the result.
    #[inline]
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
    }

    /// Gets a u64 value from the result.
    ///
    /// Returns 0 if key not found or not a number.
    #[inline]
    #[must_use]
    pub fn get_u64(&self, key: &str) -> u64 {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_u64)
            .unwrap_or_default()
    }
}

// ============================================================================
// ResponseType
// ============================================================================

/// Response type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Successful response.
    Success,
    /// Error response.
    Error,
}

// ============================================================================
// Tests
// ============================================================================
