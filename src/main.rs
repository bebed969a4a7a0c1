//! Fixed-response HTTP fixture server.
//!
//! ```text
//!   client ──TCP──▶ listener ──spawn──▶ connection task ──▶ 200 "XXXXXXXXXX"
//!                      │
//!                      └─ once mode: closed right after the first accept
//! ```
//!
//! Prints `Serving on <addr>` to stdout once bound. Logs go to stderr.

use std::path::PathBuf;

use clap::Parser;

use fixture_server::config::{self, AcceptMode, ConfigError, ServerConfig};
use fixture_server::http::server::announce;
use fixture_server::observability::logging;
use fixture_server::FixtureServer;

#[derive(Parser, Debug)]
#[command(name = "fixture-server")]
#[command(about = "Answers every HTTP request with 200 and a fixed 10-byte body", long_about = None)]
struct Cli {
    /// TOML config file; CLI flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host or IP address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (0 picks an ephemeral port).
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep accepting connections instead of exiting after the first one.
    #[arg(long)]
    forever: bool,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if self.forever {
            config.accept_mode = AcceptMode::Forever;
        }

        config::validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = Cli::parse().into_config()?;

    tracing::info!(
        bind_address = %config.listener.authority(),
        accept_mode = ?config.accept_mode,
        "Configuration loaded"
    );

    let server = FixtureServer::new(config).bind().await?;

    announce(server.local_addr())?;

    let summary = server.run().await?;

    tracing::info!(
        connections_accepted = summary.connections_accepted,
        "Shutdown complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_gives_default_config() {
        let cli = Cli::parse_from(["fixture-server"]);
        assert_eq!(cli.into_config().unwrap(), ServerConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "fixture-server",
            "--host",
            "127.0.0.1",
            "--port",
            "0",
            "--forever",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.listener.host, "127.0.0.1");
        assert_eq!(config.listener.port, 0);
        assert_eq!(config.accept_mode, AcceptMode::Forever);
    }

    #[test]
    fn empty_host_flag_fails_validation() {
        let cli = Cli::parse_from(["fixture-server", "--host", ""]);
        assert!(matches!(cli.into_config(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_port_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["fixture-server", "--port", "65536"]).is_err());
    }
}
