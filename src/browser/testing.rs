//! In-process stand-in for the Firefox extension.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use crate::transport::{Connection, PendingServer, ReadyData};

/// Tab the extension reports in its READY message.
pub(crate) const INITIAL_TAB: u32 = 1;

/// Plays the extension side of the protocol over a real localhost socket.
///
/// Every request is recorded as `(method, tabId)`.
pub(crate) struct FakeExtension {
    calls: Arc<Mutex<Vec<(String, u32)>>>,
    defer_elements: Arc<AtomicBool>,
}

impl FakeExtension {
    /// Navigating here yields an error response.
    pub(crate) const FAILING_URL: &'static str = "https://fail.invalid/";

    /// Binds a server, connects the fake and completes the handshake.
    pub(crate) async fn start() -> (Self, Connection, ReadyData) {
        let server = PendingServer::bind_localhost().await.expect("bind");
        let calls = Arc::new(Mutex::new(Vec::new()));
        let defer_elements = Arc::new(AtomicBool::new(false));

        tokio::spawn(serve(
            server.ws_url(),
            Arc::clone(&calls),
            Arc::clone(&defer_elements),
        ));

        let (connection, ready) = server.accept().await.expect("accept");
        (
            Self {
                calls,
                defer_elements,
            },
            connection,
            ready,
        )
    }

    /// Answers subscriptions with an `element.added` event instead of an
    /// immediate match.
    pub(crate) fn defer_elements(&self) {
        self.defer_elements.store(true, Ordering::SeqCst);
    }

    /// Methods received so far, in order.
    pub(crate) fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    /// `(method, tabId)` pairs received so far, in order.
    pub(crate) fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }
}

async fn serve(url: String, calls: Arc<Mutex<Vec<(String, u32)>>>, defer: Arc<AtomicBool>) {
    let (mut ws, _) = connect_async(url).await.expect("connect");

    let ready = json!({
        "id": Uuid::nil(),
        "type": "success",
        "result": { "tabId": INITIAL_TAB, "sessionId": 1 }
    });
    ws.send(Message::Text(ready.to_string().into()))
        .await
        .expect("send ready");

    let mut next_tab = INITIAL_TAB + 1;
    let mut shots = 0u32;

    while let Some(Ok(Message::Text(text))) = ws.next().await {
        let request: Value = serde_json::from_str(&text).expect("request json");
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let tab = request["tabId"].as_u64().unwrap_or_default() as u32;
        calls.lock().push((method.clone(), tab));

        let success = |result: Value| json!({ "id": request["id"], "type": "success", "result": result });

        let mut event = None;
        let reply = match method.as_str() {
            "browsingContext.navigate"
                if request["params"]["url"] == FakeExtension::FAILING_URL =>
            {
                json!({
                    "id": request["id"],
                    "type": "error",
                    "error": "unknown error",
                    "message": "navigation failed"
                })
            }
            "browsingContext.newTab" => {
                let tab_id = next_tab;
                next_tab += 1;
                success(json!({ "tabId": tab_id }))
            }
            "browsingContext.captureScreenshot" => {
                shots += 1;
                let data = Base64Standard.encode(format!("tab{tab}-shot{shots}"));
                success(json!({ "data": data }))
            }
            "element.subscribe" if defer.load(Ordering::SeqCst) => {
                event = Some(json!({
                    "id": Uuid::new_v4(),
                    "type": "event",
                    "method": "element.added",
                    "params": {
                        "strategy": request["params"]["strategy"],
                        "value": request["params"]["value"],
                        "elementId": "el-event",
                        "tabId": tab
                    }
                }));
                success(json!({ "subscriptionId": "sub-1" }))
            }
            "element.subscribe" | "element.find" => success(json!({ "elementId": "el-1" })),
            _ => success(json!({})),
        };

        if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
            break;
        }
        if let Some(event) = event
            && ws.send(Message::Text(event.to_string().into())).await.is_err()
        {
            break;
        }
    }
}
