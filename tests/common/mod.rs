#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use liveness_server::{server, AppState, Config};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Parsed raw HTTP/1.1 response
pub struct RawResponse {
    pub status: u16,
    pub head: String,
    pub body: Vec<u8>,
}

/// A listener running on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Option<oneshot::Sender<()>>,
    pub handle: JoinHandle<Result<(), liveness_server::ServerError>>,
}

impl TestServer {
    pub async fn stop(mut self) -> Result<(), liveness_server::ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.expect("server task panicked")
    }
}

pub fn test_config() -> Config {
    let mut config = Config::build(None, Some("0")).expect("default config");
    config.logging.access_log = false;
    config
}

pub async fn start_server(host: &str) -> TestServer {
    let mut config = test_config();
    config.server.host = host.to_string();
    start_server_with(config).await
}

pub async fn start_server_with(config: Config) -> TestServer {
    let listener = server::bind(config.socket_addr().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(config));
    let (tx, rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(server::serve_with_shutdown(listener, state, async move {
        let _ = rx.await;
    }));

    TestServer {
        addr,
        shutdown: Some(tx),
        handle,
    }
}

/// Address a client should dial for a listener bound on `addr`
pub fn loopback(addr: SocketAddr) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], addr.port()))
}

pub fn request(method: &str, path: &str) -> String {
    format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
}

/// Send raw bytes on a fresh connection and read until the server closes it
pub async fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    read_all(&mut stream).await
}

pub async fn read_all(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    // A reset after the response still leaves what was read so far
    let _ = stream.read_to_end(&mut buf).await;
    buf
}

pub fn parse_response(raw: &[u8]) -> RawResponse {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = String::from_utf8_lossy(&raw[..split]).to_string();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status line");
    RawResponse {
        status,
        head,
        body: raw[split + 4..].to_vec(),
    }
}

pub async fn get(addr: SocketAddr, method: &str, path: &str) -> RawResponse {
    parse_response(&send_raw(addr, request(method, path).as_bytes()).await)
}
