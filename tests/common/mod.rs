//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use fixture_server::config::{AcceptMode, ListenerConfig, ServerConfig};
use fixture_server::{FixtureServer, ServeSummary, ServerError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

pub const EXPECTED_BODY: &[u8] = b"XXXXXXXXXX";

/// Bind a fixture server on an ephemeral loopback port and run it in the
/// background.
pub async fn start_server(
    accept_mode: AcceptMode,
) -> (SocketAddr, JoinHandle<Result<ServeSummary, ServerError>>) {
    let config = ServerConfig {
        listener: ListenerConfig::new("127.0.0.1", 0),
        accept_mode,
    };
    let server = FixtureServer::new(config).bind().await.unwrap();
    let addr = server.local_addr();
    (addr, tokio::spawn(server.run()))
}

/// HTTP client that never goes through a proxy and never pools connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// A response read straight off the wire.
#[derive(Debug)]
pub struct RawResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn parse(raw: &[u8]) -> Self {
        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has no header terminator");
        let head = std::str::from_utf8(&raw[..split]).unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|line| {
                let (name, value) = line.split_once(':').unwrap();
                (name.trim().to_ascii_lowercase(), value.trim().to_string())
            })
            .collect();
        Self {
            status_line,
            headers,
            body: raw[split + 4..].to_vec(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Send raw request bytes and read until the server closes the connection.
pub async fn raw_exchange(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
        .await
        .expect("server did not close the connection")
        .unwrap();
    raw
}
