//! Fixture server setup and the accept loop.
//!
//! # Responsibilities
//! - Bind the listener from an explicit [`ServerConfig`]
//! - Accept connections and spawn one task per connection
//! - Stop accepting after the first connection in [`AcceptMode::Once`]

use std::future::Future;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::config::{AcceptMode, ListenerConfig, ServerConfig};
use crate::net::connection;
use crate::net::{Connection, Listener, ListenerError};

/// Pause after a failed `accept` before trying again.
///
/// Errors such as EMFILE repeat until a descriptor is freed; retrying
/// immediately would spin.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Error type for server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Connection task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Failed to write readiness line: {0}")]
    Announce(#[source] io::Error),
}

/// What a finished accept loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServeSummary {
    pub connections_accepted: u64,
}

/// The line printed to stdout once the listener is bound.
pub fn readiness_line(addr: SocketAddr) -> String {
    format!("Serving on {addr}")
}

/// Write the readiness line to stdout and flush it.
pub fn announce(addr: SocketAddr) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", readiness_line(addr))?;
    stdout.flush()
}

/// Fixed-response HTTP server, not yet bound.
#[derive(Debug, Clone)]
pub struct FixtureServer {
    config: ServerConfig,
}

impl FixtureServer {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the listening socket. Fails if the address is unavailable.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let listener = Listener::bind(&self.config.listener).await?;
        Ok(BoundServer {
            listener,
            accept_mode: self.config.accept_mode,
        })
    }
}

/// A server whose socket is bound and ready to accept.
#[derive(Debug)]
pub struct BoundServer {
    listener: Listener,
    accept_mode: AcceptMode,
}

impl BoundServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn accept_mode(&self) -> AcceptMode {
        self.accept_mode
    }

    /// Run the accept loop.
    ///
    /// In [`AcceptMode::Once`] this returns after the single connection has
    /// been served. In [`AcceptMode::Forever`] it never returns.
    pub async fn run(self) -> Result<ServeSummary, ServerError> {
        tracing::info!(
            address = %self.local_addr(),
            accept_mode = ?self.accept_mode,
            "Fixture server accepting"
        );

        match self.accept_mode {
            AcceptMode::Once => run_once(self.listener).await,
            AcceptMode::Forever => run_forever(self.listener).await,
        }
    }
}

async fn run_once(listener: Listener) -> Result<ServeSummary, ServerError> {
    let conn = listener.accept().await?;
    let task = tokio::spawn(connection::handle(conn));

    // Closing the socket now refuses further connections while the accepted
    // one is still being handled.
    drop(listener);
    tracing::debug!("Listener closed after first connection");

    task.await?;
    tracing::info!("Single connection served");
    Ok(ServeSummary {
        connections_accepted: 1,
    })
}

async fn run_forever(listener: Listener) -> Result<ServeSummary, ServerError> {
    let listener = &listener;
    accept_loop(move || listener.accept()).await
}

/// Spawn a task for every accepted connection, backing off after errors.
/// Never returns.
async fn accept_loop<F, Fut>(mut accept: F) -> Result<ServeSummary, ServerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Connection, ListenerError>>,
{
    loop {
        match accept().await {
            Ok(conn) => {
                tokio::spawn(connection::handle(conn));
            }
            Err(e) => {
                tracing::warn!(error = %e, backoff = ?ACCEPT_ERROR_BACKOFF, "Accept failed");
                tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
            }
        }
    }
}

/// Bind `host:port`, announce readiness on stdout, and serve exactly one
/// connection.
pub async fn serve(host: &str, port: u16) -> Result<ServeSummary, ServerError> {
    let config = ServerConfig {
        listener: ListenerConfig::new(host, port),
        accept_mode: AcceptMode::Once,
    };
    let server = FixtureServer::new(config).bind().await?;
    announce(server.local_addr()).map_err(ServerError::Announce)?;
    server.run().await
}
