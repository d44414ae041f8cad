//! Server wrapper tests: limits and shutdown deadlines.

use axum::{routing::get, Router};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use dose_service::config::ListenerConfig;
use dose_service::http::{HttpServer, ServerError};

mod common;

fn slow_router() -> Router {
    Router::new()
        .route("/slow", get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "done"
        }))
        .route("/fast", get(|| async { "fast" }))
}

#[tokio::test]
async fn shutdown_deadline_expires_with_request_in_flight() {
    let server = HttpServer::new(ListenerConfig::default(), slow_router());
    let handle = server.handle();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(server.run(listener));

    let slow = tokio::spawn(async move {
        common::client()
            .get(format!("http://{}/slow", addr))
            .send()
            .await
            .map(|res| res.status())
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    let err = handle.shutdown(Duration::from_millis(200)).await.unwrap_err();
    assert!(matches!(err, ServerError::ShutdownTimeout(_)));

    // The in-flight request still completes, then the server finishes.
    assert_eq!(slow.await.unwrap().unwrap(), 200);
    tokio::time::timeout(Duration::from_secs(3), task)
        .await
        .expect("server should finish draining")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn serve_binds_configured_address() {
    let config = ListenerConfig {
        bind_host: "127.0.0.1".to_string(),
        port: 0,
        ..ListenerConfig::default()
    };
    let server = HttpServer::new(config, slow_router());
    let handle = server.handle();
    let task = tokio::spawn(server.serve());
    tokio::time::sleep(Duration::from_millis(100)).await;

    handle.shutdown(Duration::from_secs(1)).await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn oversized_headers_are_refused() {
    let config = ListenerConfig {
        max_header_bytes: 8192,
        ..ListenerConfig::default()
    };
    let server = HttpServer::new(config, slow_router());
    let handle = server.handle();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.run(listener));

    let result = common::client()
        .get(format!("http://{}/fast", addr))
        .header("x-padding", "a".repeat(32 * 1024))
        .send()
        .await;

    match result {
        Ok(res) => assert_eq!(res.status(), 431),
        Err(_) => {} // connection closed before a response
    }

    handle.shutdown(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test]
async fn stalled_headers_hit_read_timeout() {
    let config = ListenerConfig {
        read_timeout_secs: 1,
        ..ListenerConfig::default()
    };
    let server = HttpServer::new(config, slow_router());
    let handle = server.handle();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.run(listener));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /fast HTTP/1.1\r\nHost: test\r\n").await.unwrap();

    // The server gives up on the incomplete head and closes the connection.
    let mut buf = Vec::new();
    let read = tokio::time::timeout(Duration::from_secs(4), stream.read_to_end(&mut buf)).await;
    assert!(read.is_ok(), "connection should be closed by the read timeout");

    handle.shutdown(Duration::from_secs(1)).await.unwrap();
}
