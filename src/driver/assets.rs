//! Startup page handed to Firefox as its first URL.
//!
//! The page posts a `WEBDRIVER_INIT` message; the extension's content script
//! picks it up and the background script dials the WebSocket URL inside.
//! Until the first tab is set up, it is also what the display shows, so it is
//! a plain dark screen.

use serde_json::json;

use crate::identifiers::SessionId;

// ============================================================================
// Public Functions
// ============================================================================

/// Builds the startup page as a `data:text/html,` URI.
#[must_use]
pub fn build_init_data_uri(ws_url: &str, session_id: &SessionId) -> String {
    let message = json!({
        "type": "WEBDRIVER_INIT",
        "wsUrl": ws_url,
        "sessionId": session_id.as_u32(),
    });

    let html = STARTUP_PAGE.replace("$INIT_MESSAGE", &message.to_string());
    format!("data:text/html,{}", urlencoding::encode(&html))
}

// ============================================================================
// Constants
// ============================================================================

const STARTUP_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Kiosk</title>
<style>html,body{margin:0;height:100%;background:#000;color:#444;font:16px sans-serif;display:flex;align-items:center;justify-content:center}</style>
</head>
<body>
<p>Starting&hellip;</p>
<script>window.postMessage($INIT_MESSAGE, '*');</script>
</body>
</html>"#;

// ============================================================================
// Tests
// ============================================================================
