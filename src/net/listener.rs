//! TCP listener.
//!
//! # Responsibilities
//! - Resolve and bind the configured host/port
//! - Accept incoming TCP connections and wrap them as [`Connection`]s
//!
//! There is deliberately no connection limit: every accepted connection gets
//! its own task.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{lookup_host, TcpListener, TcpSocket};

use crate::config::ListenerConfig;
use crate::net::connection::Connection;

/// Pending-connection queue length passed to `listen(2)`.
pub const LISTEN_BACKLOG: u32 = 5;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to resolve, bind or listen on the address. Fatal at startup.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    /// Failed to accept a connection.
    #[error("Failed to accept: {0}")]
    Accept(#[source] io::Error),
}

impl ListenerError {
    fn bind(addr: &str, source: io::Error) -> Self {
        ListenerError::Bind {
            addr: addr.to_string(),
            source,
        }
    }

    /// The underlying I/O error kind.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            ListenerError::Bind { source, .. } => source.kind(),
            ListenerError::Accept(e) => e.kind(),
        }
    }
}

/// A bound TCP listener.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Resolve and bind to the configured address.
    ///
    /// Only the first resolved address is tried.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let authority = config.authority();

        let addr = lookup_host((config.host.as_str(), config.port))
            .await
            .map_err(|e| ListenerError::bind(&authority, e))?
            .next()
            .ok_or_else(|| {
                ListenerError::bind(
                    &authority,
                    io::Error::new(io::ErrorKind::InvalidInput, "host resolved to no addresses"),
                )
            })?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(|e| ListenerError::bind(&authority, e))?;

        socket
            .set_reuseaddr(true)
            .map_err(|e| ListenerError::bind(&authority, e))?;
        socket
            .bind(addr)
            .map_err(|e| ListenerError::bind(&authority, e))?;
        let inner = socket
            .listen(LISTEN_BACKLOG)
            .map_err(|e| ListenerError::bind(&authority, e))?;

        let local_addr = inner
            .local_addr()
            .map_err(|e| ListenerError::bind(&authority, e))?;

        tracing::info!(
            address = %local_addr,
            backlog = LISTEN_BACKLOG,
            "Listener bound"
        );

        Ok(Self { inner, local_addr })
    }

    /// Accept the next connection.
    pub async fn accept(&self) -> Result<Connection, ListenerError> {
        let (stream, peer_addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        let connection = Connection::new(stream, peer_addr);

        tracing::debug!(
            connection_id = %connection.id(),
            peer_addr = %peer_addr,
            "Connection accepted"
        );

        Ok(connection)
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
