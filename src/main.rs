//! Transaction orchestrator service binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                TX ORCHESTRATOR                    │
//!                    │                                                   │
//!   HTTP Request     │  ┌────────┐   ┌──────────┐   ┌───────────────┐   │
//!   ─────────────────┼─▶│  http  │──▶│ pipeline │──▶│ tx builder    │   │
//!                    │  │ server │   │   ops    │   │ (nonce/fees/  │   │
//!                    │  └────────┘   └────┬─────┘   │  gas/calldata)│   │
//!                    │                    │         └──────┬────────┘   │
//!                    │       ┌────────────┼────────────────┤            │
//!                    │       ▼            ▼                ▼            │
//!                    │  ┌─────────┐  ┌──────────┐   ┌────────────┐      │
//!                    │  │ custody │  │aggregator│   │ chain node │      │
//!                    │  │ resolve │  │  routes/ │   │  JSON-RPC  │      │
//!                    │  │ + sign  │  │  build   │   │            │      │
//!                    │  └─────────┘  └──────────┘   └────────────┘      │
//!                    │                                                   │
//!                    │  ┌─────────────────────────────────────────────┐ │
//!                    │  │            Cross-Cutting Concerns            │ │
//!                    │  │  config   error taxonomy   observability    │ │
//!                    │  │  lifecycle (shutdown, cancellable poller)   │ │
//!                    │  └─────────────────────────────────────────────┘ │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tx_orchestrator::config::loader::load_config;
use tx_orchestrator::{AppConfig, HttpServer, Orchestrator};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "tx-orchestrator", about = "Remote-signed transaction orchestration service")]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the selected network profile.
    #[arg(short, long)]
    network: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Secrets may live in a local .env during development.
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tx_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("tx-orchestrator v0.1.0 starting");

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(network) = args.network {
        config.network = network;
    }

    let network = config
        .selected_network()
        .ok_or_else(|| format!("network profile '{}' not found", config.network))?;

    tracing::info!(
        network = %config.network,
        chain_id = network.chain_id,
        bind_address = %config.listener.bind_address,
        "Configuration loaded"
    );

    // Initialize metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            tx_orchestrator::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Build the dependency-injected context and serve
    let orchestrator = Arc::new(Orchestrator::from_config(&config)?);
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(orchestrator, Arc::new(config));
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
