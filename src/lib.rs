//! Fixed-response HTTP test fixture.
//!
//! A single-endpoint HTTP/1 server that answers every request with
//! `200 OK` and the body `XXXXXXXXXX`. Meant to give integration tests a real
//! endpoint to talk to.
//!
//! ```no_run
//! # async fn demo() -> Result<(), fixture_server::ServerError> {
//! use fixture_server::config::{AcceptMode, ListenerConfig, ServerConfig};
//! use fixture_server::FixtureServer;
//!
//! let config = ServerConfig {
//!     listener: ListenerConfig::new("127.0.0.1", 0),
//!     accept_mode: AcceptMode::Forever,
//! };
//! let server = FixtureServer::new(config).bind().await?;
//! println!("Serving on {}", server.local_addr());
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod net;
pub mod observability;

pub use config::ServerConfig;
pub use http::{serve, BoundServer, FixtureServer, ServeSummary, ServerError};
