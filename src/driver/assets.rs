//! Bootstrap page Firefox opens on startup.
//!
//! The page posts a `WEBDRIVER_INIT` message carrying the WebSocket URL.
//! The extension's content script validates that the URL is loopback and
//! forwards it to the background script, which dials the scraper.

// ============================================================================
// Imports
// ============================================================================

use serde_json::json;

use crate::identifiers::SessionId;

// ============================================================================
// Constants
// ============================================================================

/// Message type the content script listens for.
const INIT_MESSAGE_TYPE: &str = "WEBDRIVER_INIT";

const INIT_HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>product-scraper</title>
    <style>
        body { font-family: monospace; padding: 32px; color: #333; }
        code { color: #0a7; }
    </style>
</head>
<body>
    <p>Connecting to <code>$WS_URL</code> (session $SESSION_ID)</p>
    <script>window.postMessage($CONFIG_JSON, '*');</script>
</body>
</html>"##;

// ============================================================================
// Public Functions
// ============================================================================

/// Builds the `data:text/html,...` URI passed to Firefox as its first page.
#[must_use]
pub fn build_init_data_uri(ws_url: &str, session_id: &SessionId) -> String {
    let config = json!({
        "type": INIT_MESSAGE_TYPE,
        "wsUrl": ws_url,
        "sessionId": session_id.as_u32(),
    });

    let html = INIT_HTML_TEMPLATE
        .replace("$WS_URL", ws_url)
        .replace("$SESSION_ID", &session_id.to_string())
        .replace("$CONFIG_JSON", &config.to_string());

    format!("data:text/html,{}", urlencoding::encode(&html))
}

// ============================================================================
// Tests
// ============================================================================
