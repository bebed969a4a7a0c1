//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept)
//!     → connection.rs (connection ID, HTTP/1 exchange)
//!     → http::handler (fixed response)
//! ```
//!
//! # Design Decisions
//! - No connection limit and no accept queue beyond the socket backlog
//! - Each connection is owned by exactly one task

pub mod connection;
pub mod listener;

pub use connection::{Connection, ConnectionError, ConnectionId};
pub use listener::{Listener, ListenerError, LISTEN_BACKLOG};
