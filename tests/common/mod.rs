//! Shared harness: runs the real router on an ephemeral port.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use study_gateway::app_state::AppState;
use study_gateway::config::ServerConfig;
use study_gateway::server;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(3);

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn http(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws(&self, path: &str) -> String {
        format!("ws://{}{path}", self.addr)
    }

    pub async fn broadcast_size(&self) -> usize {
        self.state.dispatcher.registry().size().await
    }

    /// Polls until the broadcast registry reaches `expected`.
    pub async fn wait_for_size(&self, expected: usize) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        while self.broadcast_size().await != expected {
            if tokio::time::Instant::now() > deadline {
                panic!("registry never reached {expected} connections");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

pub async fn spawn_server() -> TestServer {
    let config = ServerConfig::default();
    let state = AppState::new(&config);
    let app = server::build_app(state.clone(), &config);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    let handle = tokio::spawn(server::serve(listener, app, state.clone()));

    TestServer {
        addr,
        state,
        handle,
    }
}

pub async fn connect(url: &str) -> WsClient {
    let Ok((ws, _response)) = tokio_tungstenite::connect_async(url).await else {
        panic!("ws connect to {url}");
    };
    ws
}

/// Next text frame parsed as JSON, skipping control frames.
pub async fn next_json(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let Ok(frame) = tokio::time::timeout(RECV_TIMEOUT, ws.next()).await else {
            panic!("timed out waiting for a frame");
        };
        match frame {
            Some(Ok(Message::Text(text))) => {
                return serde_json::from_str(text.as_str()).unwrap_or_default();
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

/// Waits for the server to end the connection (close frame or EOF).
pub async fn expect_closed(ws: &mut WsClient) {
    loop {
        let Ok(frame) = tokio::time::timeout(RECV_TIMEOUT, ws.next()).await else {
            panic!("connection was not closed");
        };
        match frame {
            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
            Some(Ok(_)) => {}
        }
    }
}
