//! Dose calculation service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Medicine service                         dose-service
//!   ────────────────                ┌──────────────────────────────────────┐
//!   POST /calc_dose/ ──────────────▶│ http::server ─▶ http::handler        │
//!   ◀─────────── 200 (immediately)  │                     │ try_submit     │
//!                                   │                     ▼                │
//!                                   │            dispatch::pool (bounded)  │
//!                                   │                     │                │
//!                                   │                     ▼ after 3s       │
//!   PUT /api/medicines/{id}/        │            dispatch::job             │
//!       update_dose/ ◀──────────────┤    dose::calculator → reporter       │
//!                                   └──────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use dose_service::config::{load_config, validate_config, ConfigError, ServiceConfig};
use dose_service::lifecycle::{signals, startup};
use dose_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "dose-service")]
#[command(about = "Accepts dose requests and reports computed doses downstream", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration.
    #[arg(short, long)]
    port: Option<u16>,

    /// Base URL of the medicine API, overriding the configuration.
    #[arg(long)]
    downstream_url: Option<String>,
}

impl Args {
    fn load(&self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(url) = &self.downstream_url {
            config.downstream.base_url = url.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.load()?;

    logging::init(&config.observability.log_level);
    tracing::info!("dose-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        downstream = %config.downstream.base_url,
        max_concurrent_jobs = config.workers.max_concurrent_jobs,
        queue_capacity = config.workers.queue_capacity,
        "Configuration loaded"
    );

    startup::log_diagnostics().await;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let (server, dispatcher) = dose_service::build_service(&config)?;
    let handle = server.handle();
    let mut server_task = tokio::spawn(server.serve());

    tokio::select! {
        result = &mut server_task => {
            // The server only returns on its own when it failed to start.
            result??;
            return Ok(());
        }
        signal = signals::shutdown_signal() => {
            let signal = signal?;
            tracing::info!(signal, "Shutdown signal received");
        }
    }

    if let Err(e) = handle.shutdown(config.listener.shutdown_timeout()).await {
        tracing::warn!(error = %e, "Graceful shutdown incomplete");
    } else {
        server_task.await??;
    }

    let in_flight = dispatcher.stats().in_flight;
    if in_flight > 0 {
        tracing::warn!(in_flight, "Exiting with dose jobs still pending; their reports are dropped");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
