//! WebSocket connection and event loop.
//!
//! The connection spawns a tokio task that handles:
//!
//! - Incoming messages from the extension (responses, events)
//! - Outgoing commands from the kiosk
//! - Request/response correlation by UUID
//! - Dispatch of events to registered handlers

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{from_str, to_string};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{RequestId, SessionId, TabId};
use crate::protocol::{Event, Request, Response};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for command execution.
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum pending requests before rejecting new ones.
const MAX_PENDING_REQUESTS: usize = 100;

/// Timeout for READY handshake.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Types
// ============================================================================

/// Map of request IDs to response channels.
type CorrelationMap = FxHashMap<RequestId, oneshot::Sender<Result<Response>>>;

/// Event handler callback type.
///
/// Called for each event received from the extension.
pub type EventHandler = Box<dyn Fn(&Event) + Send + Sync>;

/// Registered event handlers, keyed by registration.
type HandlerMap = FxHashMap<HandlerId, EventHandler>;

/// Registration token returned by [`Connection::add_event_handler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

// ============================================================================
// ReadyData
// ============================================================================

/// Data received in the READY handshake message.
#[derive(Debug, Clone, Copy)]
pub struct ReadyData {
    /// Tab Firefox opened at startup.
    pub tab_id: TabId,
    /// Session the extension assigned.
    pub session_id: SessionId,
}

impl ReadyData {
    fn from_response(response: &Response) -> Result<Self> {
        let tab_id = response
            .get_u64("tabId")
            .and_then(|v| u32::try_from(v).ok())
            .and_then(TabId::new)
            .ok_or_else(|| Error::protocol("READY message without valid tabId"))?;
        let session_id = response
            .get_u64("sessionId")
            .and_then(|v| u32::try_from(v).ok())
            .and_then(SessionId::from_u32)
            .unwrap_or_else(SessionId::next);

        Ok(Self { tab_id, session_id })
    }
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Send a request and wait for response.
    Send {
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
    },
    /// Remove a timed-out correlation entry.
    RemoveCorrelation(RequestId),
    /// Shutdown the connection.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to the Firefox extension.
///
/// Cloning shares the same underlying event loop.
#[derive(Clone)]
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Correlation map (shared with event loop).
    correlation: Arc<Mutex<CorrelationMap>>,
    /// Event handlers (shared with event loop).
    handlers: Arc<Mutex<HandlerMap>>,
    /// Source of handler registration tokens.
    next_handler: Arc<AtomicU64>,
    /// READY response, taken by [`wait_ready`](Self::wait_ready).
    ready_rx: Arc<Mutex<Option<oneshot::Receiver<Result<Response>>>>>,
}

impl Connection {
    /// Creates a new connection from a WebSocket stream.
    ///
    /// The READY correlation is registered before the event loop starts so
    /// an early handshake message is never lost.
    pub(crate) fn new(ws_stream: WebSocketStream<TcpStream>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));
        let handlers = Arc::new(Mutex::new(HandlerMap::default()));

        let (ready_tx, ready_rx) = oneshot::channel();
        correlation.lock().insert(RequestId::ready(), ready_tx);

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&correlation),
            Arc::clone(&handlers),
        ));

        Self {
            command_tx,
            correlation,
            handlers,
            next_handler: Arc::new(AtomicU64::new(1)),
            ready_rx: Arc::new(Mutex::new(Some(ready_rx))),
        }
    }

    /// Waits for the READY handshake message.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if READY not received within 30s
    /// - [`Error::ConnectionClosed`] if the connection closes first
    /// - [`Error::Protocol`] if READY was already consumed or is malformed
    pub async fn wait_ready(&self) -> Result<ReadyData> {
        let rx = self
            .ready_rx
            .lock()
            .take()
            .ok_or_else(|| Error::protocol("READY handshake already consumed"))?;

        let response = timeout(READY_TIMEOUT, rx)
            .await
            .map_err(|_| Error::connection_timeout(READY_TIMEOUT.as_millis() as u64))???;

        let ready = ReadyData::from_response(&response)?;
        debug!(tab_id = %ready.tab_id, session_id = %ready.session_id, "READY handshake completed");
        Ok(ready)
    }

    /// Registers an event handler.
    ///
    /// Every handler sees every event; handlers filter on their own.
    pub fn add_event_handler(&self, handler: EventHandler) -> HandlerId {
        let id = HandlerId(self.next_handler.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().insert(id, handler);
        id
    }

    /// Removes a previously registered handler.
    pub fn remove_event_handler(&self, id: HandlerId) {
        self.handlers.lock().remove(&id);
    }

    /// Sends a request and waits for response with default timeout (30s).
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if connection is closed
    /// - [`Error::RequestTimeout`] if response not received within timeout
    /// - [`Error::Protocol`] if too many pending requests or the extension
    ///   answered with an error
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.send_with_timeout(request, DEFAULT_COMMAND_TIMEOUT)
            .await
    }

    /// Sends a request and waits for response with custom timeout.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_with_timeout(
        &self,
        request: Request,
        request_timeout: Duration,
    ) -> Result<Response> {
        let request_id = request.id;

        {
            let pending = self.correlation.lock().len();
            if pending >= MAX_PENDING_REQUESTS {
                warn!(pending, max = MAX_PENDING_REQUESTS, "Too many pending requests");
                return Err(Error::protocol(format!(
                    "Too many pending requests: {pending}/{MAX_PENDING_REQUESTS}"
                )));
            }
        }

        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(ConnectionCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        match timeout(request_timeout, response_rx).await {
            Ok(Ok(result)) => result?.into_checked(),
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                let _ = self
                    .command_tx
                    .send(ConnectionCommand::RemoveCorrelation(request_id));

                Err(Error::request_timeout(
                    request_id,
                    request_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Returns the number of pending requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Closes the WebSocket and fails all pending requests.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop(
        ws_stream: WebSocketStream<TcpStream>,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
        handlers: Arc<Mutex<HandlerMap>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &correlation, &handlers);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Binary, Ping, Pong
                        _ => {}
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { request, response_tx }) => {
                            Self::handle_send_command(
                                request,
                                response_tx,
                                &mut ws_write,
                                &correlation,
                            ).await;
                        }

                        Some(ConnectionCommand::RemoveCorrelation(request_id)) => {
                            correlation.lock().remove(&request_id);
                            debug!(%request_id, "Removed timed-out correlation");
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        Self::fail_pending_requests(&correlation);
        handlers.lock().clear();

        debug!("Event loop terminated");
    }

    /// Routes an incoming text message to its waiter or to the handlers.
    fn handle_incoming_message(
        text: &str,
        correlation: &Mutex<CorrelationMap>,
        handlers: &Mutex<HandlerMap>,
    ) {
        if let Ok(response) = from_str::<Response>(text) {
            let tx = correlation.lock().remove(&response.id);

            match tx {
                Some(tx) => {
                    let _ = tx.send(Ok(response));
                }
                None => warn!(id = %response.id, "Response for unknown request"),
            }
            return;
        }

        if let Ok(event) = from_str::<Event>(text) {
            trace!(method = %event.method, "Event received");
            for handler in handlers.lock().values() {
                handler(&event);
            }
            return;
        }

        warn!(text = %text, "Failed to parse incoming message");
    }

    /// Serializes and writes one request.
    async fn handle_send_command(
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
        ws_write: &mut SplitSink<WebSocketStream<TcpStream>, Message>,
        correlation: &Mutex<CorrelationMap>,
    ) {
        let request_id = request.id;

        let json = match to_string(&request) {
            Ok(json) => json,
            Err(e) => {
                let _ = response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        correlation.lock().insert(request_id, response_tx);

        if let Err(e) = ws_write.send(Message::Text(json.into())).await
            && let Some(tx) = correlation.lock().remove(&request_id)
        {
            let _ = tx.send(Err(Error::connection(e.to_string())));
        }

        trace!(%request_id, "Request sent");
    }

    /// Fails all pending requests with [`Error::ConnectionClosed`].
    fn fail_pending_requests(correlation: &Mutex<CorrelationMap>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
