//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (0.0.0.0:5000, once)
//!     → loader.rs (optional TOML file)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (main.rs)
//!     → ServerConfig (immutable, owned by the server)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation returns all errors, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AcceptMode, ListenerConfig, ServerConfig};
pub use validation::{validate_config, ValidationError};
