//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use dose_service::config::ServiceConfig;
use dose_service::http::ServerError;
use dose_service::{build_service, JobDispatcher, ServerHandle};

/// A request received by the mock medicine API.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
    pub received_at: Instant,
}

/// Mock medicine API that records every call and answers with a fixed status.
pub struct MockDownstream {
    pub addr: SocketAddr,
    calls: mpsc::UnboundedReceiver<RecordedCall>,
}

impl MockDownstream {
    pub async fn start() -> Self {
        Self::start_with_status(StatusCode::OK).await
    }

    pub async fn start_with_status(status: StatusCode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, calls) = mpsc::unbounded_channel();

        let app = Router::new().fallback(record).with_state(MockState { tx, status });
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, calls }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait up to `within` for the next recorded call.
    pub async fn next_call(&mut self, within: Duration) -> Option<RecordedCall> {
        tokio::time::timeout(within, self.calls.recv()).await.ok().flatten()
    }
}

#[derive(Clone)]
struct MockState {
    tx: mpsc::UnboundedSender<RecordedCall>,
    status: StatusCode,
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let call = RecordedCall {
        method,
        path: uri.path().to_string(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
        received_at: Instant::now(),
    };
    let _ = state.tx.send(call);
    state.status
}

/// A running dose service bound to an ephemeral port.
pub struct TestService {
    pub addr: SocketAddr,
    pub handle: ServerHandle,
    pub dispatcher: JobDispatcher,
    pub task: JoinHandle<Result<(), ServerError>>,
}

impl TestService {
    pub async fn start(downstream_url: &str, rng_seed: Option<u64>) -> Self {
        let mut config = ServiceConfig::default();
        config.downstream.base_url = downstream_url.to_string();
        config.downstream.request_timeout_secs = 2;
        config.workers.rng_seed = rng_seed;
        config.observability.metrics_enabled = false;

        let (server, dispatcher) = build_service(&config).unwrap();
        let handle = server.handle();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(server.run(listener));

        Self {
            addr,
            handle,
            dispatcher,
            task,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Client that never reuses connections and ignores proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
