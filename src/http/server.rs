//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all operation handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind the server to a listener with graceful shutdown
//!
//! The surface is deliberately thin: the route table is the fixed mapping
//! from intents to statically known handlers, validated at startup, and no
//! handler adds business logic on top of the pipeline.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Request};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::handlers;
use crate::lifecycle::Poller;
use crate::pipeline::Orchestrator;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub poller: Arc<Poller>,
    pub config: Arc<AppConfig>,
}

/// UUID v4 request ids.
#[derive(Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// HTTP server for the orchestrator control surface.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server over an orchestrator context.
    pub fn new(orchestrator: Arc<Orchestrator>, config: Arc<AppConfig>) -> Self {
        let poller = Arc::new(Poller::new(Duration::from_secs(config.pipeline.poll_interval_secs)));
        let state = AppState { orchestrator, poller, config: config.clone() };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the router: one route per pipeline operation.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/networks", get(handlers::list_networks))
            .route("/balance", get(handlers::get_balance))
            .route("/transfer", post(handlers::transfer))
            .route("/swap", post(handlers::swap))
            .route("/swap/quote", get(handlers::swap_quote))
            .route("/tokens", post(handlers::create_token))
            .route("/tokens/sell", post(handlers::sell_token))
            .route("/tokens/sell-quote", get(handlers::sell_quote))
            .route("/tokens/lookup", get(handlers::lookup_token))
            .route("/loop/start", post(handlers::start_loop))
            .route("/loop/stop", post(handlers::stop_loop))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve when the process receives a termination signal.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
    tracing::info!("Shutdown signal received");
}
