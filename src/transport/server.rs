//! Loopback WebSocket listener the extension dials into.
//!
//! # Connection Flow
//!
//! 1. Bind to `127.0.0.1:0` and let the OS pick a port
//! 2. Launch Firefox with the extension and a data URI carrying `ws_url()`
//! 3. Extension connects and sends READY with its tab/session IDs
//! 4. [`PendingServer::accept`] hands back a live [`Connection`]

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, SocketAddr};
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

/// How long Firefox gets to start and dial back.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// PendingServer
// ============================================================================

/// A listener that is bound but has not yet seen the extension.
///
/// ```ignore
/// let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// let ws_url = server.ws_url();
/// // launch Firefox pointing at ws_url ...
/// let (connection, ready) = server.accept().await?;
/// ```
pub struct PendingServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl PendingServer {
    /// Binds to `ip:port`. Port 0 picks a free port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(ip, port)).await?;
        let addr = listener.local_addr()?;

        debug!(port = addr.port(), "WebSocket server bound");

        Ok(Self { listener, addr })
    }

    /// Returns the port the server is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Returns the local socket address.
    #[inline]
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the URL the extension should connect to.
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Accepts the extension's connection and completes the READY handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if nothing connects within 30s
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    /// - Any error from [`Connection::wait_ready`]
    pub async fn accept(self) -> Result<(Connection, ReadyData)> {
        let (stream, peer) = timeout(CONNECTION_TIMEOUT, self.listener.accept())
            .await
            .map_err(|_| Error::connection_timeout(CONNECTION_TIMEOUT.as_millis() as u64))??;

        debug!(?peer, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        info!(port = self.addr.port(), "Extension connected");

        let connection = Connection::new(ws_stream);
        let ready = connection.wait_ready().await?;

        Ok((connection, ready))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn test_server_bind_random_port() {
        let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");

        assert!(server.port() > 0);
        assert_eq!(server.ws_url(), format!("ws://127.0.0.1:{}", server.port()));
    }

    #[tokio::test]
    async fn test_server_local_addr() {
        let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");

        let addr = server.local_addr();
        assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(addr.port(), server.port());
    }

    #[tokio::test]
    async fn test_upgrade_failure_is_connection_error() {
        use tokio::io::AsyncWriteExt;

        let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");
        let addr = server.local_addr();

        tokio::spawn(async move {
            let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
            let _ = stream.write_all(b"GET / HTTP/1.1\r\n\r\n").await;
        });

        let err = server.accept().await.err().expect("upgrade should fail");
        assert!(err.is_connection_error());
    }
}
