//! A single accepted connection and the code that drives it.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Own the accepted stream for its whole lifetime
//! - Run one HTTP/1 exchange over it with the fixed-response handler

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpStream;

use crate::http::handler::fixed_response;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is enough; only uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Error raised while serving a single connection.
///
/// Covers unparseable requests as well as peer resets and broken pipes.
/// It only ever ends the task that owns the connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("HTTP connection error: {0}")]
    Http(#[from] hyper::Error),
}

/// One accepted TCP session.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    peer_addr: SocketAddr,
    stream: TcpStream,
}

impl Connection {
    pub fn new(stream: TcpStream, peer_addr: SocketAddr) -> Self {
        Self {
            id: ConnectionId::new(),
            peer_addr,
            stream,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Serve one request with the fixed response, then close.
    ///
    /// Keep-alive is off, so hyper answers with `connection: close` and the
    /// stream is shut down once the response is flushed.
    pub async fn serve(self) -> Result<(), ConnectionError> {
        let Connection { id, peer_addr, stream } = self;
        let io = TokioIo::new(stream);

        http1::Builder::new()
            .keep_alive(false)
            .serve_connection(io, service_fn(fixed_response::<Incoming>))
            .await?;

        tracing::trace!(connection_id = %id, peer_addr = %peer_addr, "Connection closed");
        Ok(())
    }
}

/// Serve a connection, reporting any error instead of returning it.
///
/// This is the body of every per-connection task.
pub async fn handle(connection: Connection) {
    let id = connection.id();
    let peer_addr = connection.peer_addr();

    if let Err(e) = connection.serve().await {
        match &e {
            ConnectionError::Http(err) if err.is_incomplete_message() || err.is_closed() => {
                tracing::debug!(connection_id = %id, peer_addr = %peer_addr, error = %e, "Peer went away");
            }
            ConnectionError::Http(_) => {
                tracing::warn!(connection_id = %id, peer_addr = %peer_addr, error = %e, "Connection failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn connection_id_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        assert_ne!(id1, id2);
        assert!(id2.as_u64() > id1.as_u64());
    }

    #[test]
    fn connection_id_display() {
        let id = ConnectionId::new();
        assert_eq!(id.to_string(), format!("conn-{}", id.as_u64()));
    }

    async fn accepted_pair() -> (Connection, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap())
            .await
            .unwrap();
        let (stream, peer_addr) = listener.accept().await.unwrap();
        (Connection::new(stream, peer_addr), client)
    }

    #[tokio::test]
    async fn serve_writes_fixed_response_and_closes() {
        let (connection, mut client) = accepted_pair().await;
        let task = tokio::spawn(connection.serve());

        client
            .write_all(b"GET /whatever HTTP/1.1\r\nHost: test\r\n\r\n")
            .await
            .unwrap();

        let mut raw = Vec::new();
        client.read_to_end(&mut raw).await.unwrap();
        let raw = String::from_utf8(raw).unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"), "got {raw:?}");
        assert!(raw.ends_with("\r\n\r\nXXXXXXXXXX"), "got {raw:?}");
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn serve_answers_http10_requests() {
        let (connection, mut client) = accepted_pair().await;
        let task = tokio::spawn(connection.serve());

        client.write_all(b"GET / HTTP/1.0\r\n\r\n").await.unwrap();

        let mut raw = Vec::new();
        client.read_to_end(&mut raw).await.unwrap();
        let raw = String::from_utf8(raw).unwrap();

        assert!(raw.starts_with("HTTP/1."), "got {raw:?}");
        assert!(raw.contains(" 200 OK\r\n"));
        assert!(raw.ends_with("XXXXXXXXXX"));
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn garbage_request_is_a_connection_error() {
        let (connection, mut client) = accepted_pair().await;
        let task = tokio::spawn(connection.serve());

        client.write_all(b"\x00\x01 not http\r\n\r\n").await.unwrap();
        let mut raw = Vec::new();
        let _ = client.read_to_end(&mut raw).await;

        let result = task.await.unwrap();
        assert!(matches!(result, Err(ConnectionError::Http(_))));
    }

    #[tokio::test]
    async fn handle_swallows_peer_disconnect() {
        let (connection, client) = accepted_pair().await;
        drop(client);
        // Must return rather than panic or propagate.
        handle(connection).await;
    }
}
