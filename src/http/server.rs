//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Bind the listener on all interfaces (or a given listener in tests)
//! - Apply connection limits: header read timeout, header buffer size
//! - Wire up middleware (request ID, tracing, request timeout, body limit)
//! - Stop accepting and drain in-flight requests on shutdown

use axum::Router;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::{conn::auto, graceful::GracefulShutdown},
    service::TowerToHyperService,
};
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ListenerConfig;
use crate::lifecycle::Shutdown;

/// Pause after a failed accept (e.g. out of file descriptors).
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Errors that end the server or its shutdown.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("listener error: {0}")]
    Listener(#[from] io::Error),

    #[error("in-flight requests did not finish within {0:?}")]
    ShutdownTimeout(Duration),
}

/// HTTP server for the dose service.
pub struct HttpServer {
    router: Router,
    config: ListenerConfig,
    shutdown: Shutdown,
    stopped: watch::Sender<bool>,
}

/// Cloneable handle for stopping a running [`HttpServer`].
#[derive(Debug, Clone)]
pub struct ServerHandle {
    shutdown: Shutdown,
    stopped: watch::Receiver<bool>,
}

impl HttpServer {
    /// Wrap `router` with the server-level middleware stack.
    #[allow(deprecated)]
    pub fn new(config: ListenerConfig, router: Router) -> Self {
        let router = router
            .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
            .layer(TimeoutLayer::new(config.write_timeout()))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        let (stopped, _) = watch::channel(false);

        Self {
            router,
            config,
            shutdown: Shutdown::new(),
            stopped,
        }
    }

    /// Handle that can stop this server once it is running.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.shutdown.clone(),
            stopped: self.stopped.subscribe(),
        }
    }

    /// Bind `bind_host:port` and serve until shutdown.
    pub async fn serve(self) -> Result<(), ServerError> {
        let address = self.config.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;
        self.run(listener).await
    }

    /// Serve an already bound listener until shutdown.
    ///
    /// Returns `Ok(())` once a requested shutdown has drained every
    /// connection.
    pub async fn run(self, listener: TcpListener) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            read_timeout_secs = self.config.read_timeout_secs,
            write_timeout_secs = self.config.write_timeout_secs,
            max_header_bytes = self.config.max_header_bytes,
            "HTTP server starting"
        );

        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.read_timeout())
            .max_buf_size(self.config.max_header_bytes);
        builder
            .http2()
            .max_header_list_size(u32::try_from(self.config.max_header_bytes).unwrap_or(u32::MAX));

        let graceful = GracefulShutdown::new();
        let mut shutdown = self.shutdown.subscribe();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                            continue;
                        }
                    };

                    let service = TowerToHyperService::new(self.router.clone());
                    let connection = builder
                        .serve_connection_with_upgrades(TokioIo::new(stream), service)
                        .into_owned();
                    let connection = graceful.watch(connection);

                    tokio::spawn(async move {
                        if let Err(e) = connection.await {
                            tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
                        }
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        drop(listener);
        graceful.shutdown().await;
        self.stopped.send_replace(true);

        tracing::info!("HTTP server stopped");
        Ok(())
    }

}

impl ServerHandle {
    /// Stop accepting connections and wait up to `deadline` for in-flight
    /// requests to finish.
    ///
    /// On timeout the server keeps draining in the background.
    pub async fn shutdown(&self, deadline: Duration) -> Result<(), ServerError> {
        self.shutdown.trigger();

        let mut stopped = self.stopped.clone();
        let drained = tokio::time::timeout(deadline, async {
            // A closed channel means the server was dropped without running.
            let _ = stopped.wait_for(|stopped| *stopped).await;
        })
        .await;

        drained.map_err(|_| ServerError::ShutdownTimeout(deadline))
    }
}
