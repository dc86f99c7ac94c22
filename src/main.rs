//! Flight search proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser                    ┌──────────────────────────────────────────┐
//!   ─────────────────────────▶ │ request id → trace → CORS → timeout      │
//!                              │            │                             │
//!                              │            ▼                             │
//!                              │  handlers (search / results / redirect)  │
//!                              │            │                             │
//!                              │            ▼                             │
//!                              │  UpstreamClient (marker + token) ────────┼──▶ Travelpayouts
//!   ◀───────────────────────── │  JSON passthrough / error body           │     API
//!                              └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use flight_proxy::config::load_config;
use flight_proxy::http::HttpServer;
use flight_proxy::lifecycle::{signals, Shutdown};
use flight_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "flight-proxy", version)]
#[command(about = "Proxy between a flight search frontend and the Travelpayouts API")]
struct Args {
    /// Path to a TOML config file. Environment variables override its values.
    #[arg(short, long, env = "FLIGHT_PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env first so it can also supply FLIGHT_PROXY_CONFIG
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability)?;

    tracing::info!("flight-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = ?config.upstream,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
