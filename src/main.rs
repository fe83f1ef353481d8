//! Launchpad site API.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────┐
//!                      │            LAUNCHPAD API              │
//!     Browser / CLI    │  ┌──────────┐    ┌────────────────┐  │
//!     ─────────────────┼─▶│  http    │───▶│ GET /api/wallet │  │
//!                      │  │ server   │    │ GET /success    │  │
//!                      │  └──────────┘    │ GET /health     │  │
//!                      │                  └────────────────┘  │
//!                      │  ┌────────┐ ┌──────────────┐ ┌─────┐ │
//!                      │  │ config │ │observability │ │life-│ │
//!                      │  │        │ │              │ │cycle│ │
//!                      │  └────────┘ └──────────────┘ └─────┘ │
//!                      └──────────────────────────────────────┘
//! ```
//!
//! The payment itself runs client side, see `launchpad-cli pay`.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use launchpad::config::loader::load_config_or_default;
use launchpad::lifecycle::{spawn_signal_handler, Shutdown};
use launchpad::observability::{init_metrics, init_tracing};
use launchpad::HttpServer;

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Launchpad site API: receiver wallet and success view", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config_or_default(args.config.as_deref())?;

    init_tracing(&config.observability.log_level);
    tracing::info!("launchpad v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        receiver_configured = config.receiver.wallet().is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_handler(shutdown.clone());

    HttpServer::new(&config).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
