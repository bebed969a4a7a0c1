//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted connection
//!     → server.rs (bind, accept loop, one task per connection)
//!     → net::connection (hyper HTTP/1 driver, keep-alive off)
//!     → handler.rs (fixed 200 response)
//!     → connection closed
//! ```

pub mod handler;
pub mod server;

pub use handler::{fixed_response, FIXED_BODY, FIXED_BODY_LEN};
pub use server::{serve, BoundServer, FixtureServer, ServeSummary, ServerError};
