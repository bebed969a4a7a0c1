//! Configuration schema definitions.
//!
//! The fixture exposes only what it needs to be reachable: where to bind and
//! whether to stop after the first connection. All types derive Serde traits
//! for deserialization from a TOML file.

use serde::{Deserialize, Serialize};

/// Default bind host (all IPv4 interfaces).
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 5000;

/// Root configuration for the fixture server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// How many connections the accept loop takes before it stops.
    pub accept_mode: AcceptMode,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP address to bind (e.g., "0.0.0.0", "127.0.0.1", "localhost").
    pub host: String,

    /// Port to bind. `0` asks the OS for an ephemeral port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ListenerConfig {
    /// Convenience constructor.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port` as written in the config, before resolution.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accept loop behavior.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AcceptMode {
    /// Accept exactly one connection, serve it, then return.
    ///
    /// The listening socket is closed as soon as that connection is accepted,
    /// so later connection attempts are refused rather than queued.
    #[default]
    Once,
    /// Accept connections until the process exits.
    Forever,
}
