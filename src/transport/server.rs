//! WebSocket server the Firefox extension connects to.
//!
//! # Connection Flow
//!
//! 1. Bind to `localhost:0` (random port)
//! 2. Launch Firefox with the extension and a data URI carrying the URL
//! 3. The extension connects and sends READY with the initial tab
//! 4. The connection is ready for commands

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::Connection;
use super::connection::ReadyData;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for waiting for Firefox to connect.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// PendingServer
// ============================================================================

/// A WebSocket server that is bound but not yet connected.
pub struct PendingServer {
    /// TCP listener for incoming connections.
    listener: TcpListener,
    /// Port the server is bound to.
    port: u16,
}

impl PendingServer {
    /// Binds to `127.0.0.1` on a port chosen by the OS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind_localhost() -> Result<Self> {
        Self::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await
    }

    /// Binds a WebSocket server to the specified address and port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(ip, port)).await?;
        let port = listener.local_addr()?.port();

        debug!(port, "WebSocket server bound");

        Ok(Self { listener, port })
    }

    /// Returns the port the server is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the WebSocket URL for this server.
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Accepts the extension's connection and completes the handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if Firefox doesn't connect within 30s
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    /// - [`Error::Protocol`] if the READY handshake is malformed
    pub async fn accept(self) -> Result<(Connection, ReadyData)> {
        let (stream, addr) = timeout(CONNECTION_TIMEOUT, self.listener.accept())
            .await
            .map_err(|_| Error::connection_timeout(CONNECTION_TIMEOUT.as_millis() as u64))??;

        debug!(%addr, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        info!(port = self.port, "Extension connected");

        let connection = Connection::new(ws_stream);
        let ready = connection.wait_ready().await?;

        Ok((connection, ready))
    }
}

// ============================================================================
// Tests
// ============================================================================
