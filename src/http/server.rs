//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, metrics)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::LaunchpadConfig;
use crate::http::handlers::{self, AppState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, track_requests};
use crate::lifecycle::Shutdown;

/// HTTP server for the launchpad site API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &LaunchpadConfig) -> Self {
        let state = AppState::new(config.receiver.wallet().map(str::to_owned));
        if state.receiver_wallet.is_none() {
            tracing::warn!("No receiver wallet configured; /api/wallet will report an error");
        }

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &LaunchpadConfig, state: AppState) -> Router {
        Router::new()
            .route(
                "/api/wallet",
                get(handlers::receiver_wallet).fallback(handlers::method_not_allowed),
            )
            .route(&config.payment.success_path, get(handlers::success_page))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(middleware::from_fn(track_requests))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The configured router, for serving or in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Arc<Shutdown>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
