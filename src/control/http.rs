//! HTTP control API.
//!
//! | Route | Effect |
//! |-------|--------|
//! | `GET /` | Control page |
//! | `GET /api/status` | Current [`StatusUpdate`] |
//! | `GET /api/status/ws` | Status stream, current snapshot first |
//! | `POST /api/cycling/start` | Start or restart cycling |
//! | `POST /api/cycling/pause` | Stop cycling |
//! | `POST /api/tabs/next` | Show the next tab |
//! | `POST /api/tabs/previous` | Show the previous tab |
//! | `POST /api/tabs/{id}/activate` | Show a specific tab |
//! | `GET /api/tabs` | IDs of tabs with a screenshot |
//! | `GET /api/tabs/{id}/image` | Latest screenshot (PNG) |
//! | `GET /api/backlight` | Attached display IDs |
//! | `GET /api/backlight/{display}` | Backlight state |
//! | `PUT /api/backlight/{display}` | Set backlight, body `{"status": bool}` |
//! | `POST /api/backlight/{display}/toggle` | Invert backlight |
//!
//! Failures answer with `{"error": "..."}`.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::{Sink, SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backlight::{Backlight, DisplayStatus};
use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::kiosk::{StatusUpdate, TabCycleController};

// ============================================================================
// Constants
// ============================================================================

const INDEX_HTML: &str = include_str!("index.html");

// ============================================================================
// AppState
// ============================================================================

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    controller: TabCycleController,
    backlight: Arc<dyn Backlight>,
    interval: Duration,
}

impl AppState {
    /// Creates handler state. `interval` is used when cycling is resumed.
    #[must_use]
    pub fn new(
        controller: TabCycleController,
        backlight: Arc<dyn Backlight>,
        interval: Duration,
    ) -> Self {
        Self {
            controller,
            backlight,
            interval,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Builds the control API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/status", get(status))
        .route("/api/status/ws", get(status_ws))
        .route("/api/cycling/start", post(start_cycling))
        .route("/api/cycling/pause", post(pause_cycling))
        .route("/api/tabs", get(list_tabs))
        .route("/api/tabs/next", post(next_tab))
        .route("/api/tabs/previous", post(previous_tab))
        .route("/api/tabs/{id}/activate", post(activate_tab))
        .route("/api/tabs/{id}/image", get(tab_image))
        .route("/api/backlight", get(list_displays))
        .route("/api/backlight/{display}", get(get_backlight).put(set_backlight))
        .route("/api/backlight/{display}/toggle", post(toggle_backlight))
        .with_state(state)
}

/// Serves the control API on `listener` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns [`Error::Io`] if the server fails.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP control API listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("HTTP control API stopped");
    Ok(())
}

// ============================================================================
// ApiError
// ============================================================================

/// [`Error`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            Error::EmptyRegistry | Error::RegistrySealed => StatusCode::CONFLICT,
            e if e.is_driver_error() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn parse_tab_id(raw: &str) -> ApiResult<TabId> {
    raw.parse().map_err(|()| Error::unknown_tab(raw).into())
}

// ============================================================================
// Handlers - Status
// ============================================================================

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn status(State(state): State<AppState>) -> Json<StatusUpdate> {
    Json(state.controller.status())
}

async fn status_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_status(socket, state.controller))
}

async fn stream_status(socket: WebSocket, controller: TabCycleController) {
    let mut updates = controller.subscribe();
    let (mut sender, mut receiver) = socket.split();

    debug!("Status stream opened");

    if send_update(&mut sender, &controller.status()).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(update) => {
                    if send_update(&mut sender, &update).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Status stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },

            message = receiver.next() => match message {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    debug!("Status stream closed");
}

async fn send_update<S>(sender: &mut S, update: &StatusUpdate) -> Result<()>
where
    S: Sink<Message> + Unpin,
{
    let text = serde_json::to_string(update)?;
    sender
        .send(Message::Text(text.into()))
        .await
        .map_err(|_| Error::ConnectionClosed)
}

// ============================================================================
// Handlers - Cycling
// ============================================================================

async fn start_cycling(State(state): State<AppState>) -> ApiResult<Json<StatusUpdate>> {
    state.controller.start_cycling(state.interval).await?;
    Ok(Json(state.controller.status()))
}

async fn pause_cycling(State(state): State<AppState>) -> Json<StatusUpdate> {
    state.controller.pause_cycling().await;
    Json(state.controller.status())
}

// ============================================================================
// Handlers - Tabs
// ============================================================================

async fn list_tabs(State(state): State<AppState>) -> Json<Vec<TabId>> {
    let mut ids = state.controller.known_tab_ids();
    ids.sort_unstable();
    Json(ids)
}

async fn next_tab(State(state): State<AppState>) -> ApiResult<Json<StatusUpdate>> {
    state.controller.switch_next().await?;
    Ok(Json(state.controller.status()))
}

async fn previous_tab(State(state): State<AppState>) -> ApiResult<Json<StatusUpdate>> {
    state.controller.switch_previous().await?;
    Ok(Json(state.controller.status()))
}

async fn activate_tab(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusUpdate>> {
    let tab_id = parse_tab_id(&id)?;
    state.controller.switch_to_id(tab_id).await?;
    Ok(Json(state.controller.status()))
}

async fn tab_image(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let tab_id = parse_tab_id(&id)?;
    let image = state.controller.image_for(tab_id)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], image.data().to_vec()).into_response())
}

// ============================================================================
// Handlers - Backlight
// ============================================================================

#[derive(Debug, Deserialize)]
struct SetBacklight {
    status: bool,
}

async fn list_displays(State(state): State<AppState>) -> ApiResult<Json<Vec<u8>>> {
    Ok(Json(state.backlight.list_displays().await?))
}

async fn get_backlight(
    State(state): State<AppState>,
    Path(display): Path<u8>,
) -> ApiResult<Json<DisplayStatus>> {
    let status = state.backlight.get(display).await?;
    Ok(Json(DisplayStatus { display, status }))
}

async fn set_backlight(
    State(state): State<AppState>,
    Path(display): Path<u8>,
    Json(body): Json<SetBacklight>,
) -> ApiResult<Json<DisplayStatus>> {
    let status = state.backlight.set(display, body.status).await?;
    Ok(Json(publish_backlight(&state, display, status)))
}

async fn toggle_backlight(
    State(state): State<AppState>,
    Path(display): Path<u8>,
) -> ApiResult<Json<DisplayStatus>> {
    let status = state.backlight.toggle(display).await?;
    Ok(Json(publish_backlight(&state, display, status)))
}

fn publish_backlight(state: &AppState, display: u8, status: bool) -> DisplayStatus {
    let backlight = DisplayStatus { display, status };
    info!(%backlight, "Backlight changed");
    state.controller.publish_backlight(backlight);
    backlight
}

// ============================================================================
// Tests
// ============================================================================
