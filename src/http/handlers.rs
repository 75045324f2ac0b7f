//! Request handlers for the control surface.
//!
//! Each handler maps 1:1 onto a pipeline operation: deserialize parameters,
//! invoke, and render either `{"result": ...}` or `{"error": true,
//! "detail": ...}`. No business logic lives here.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::PipelineError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::pipeline::ops::{
    BalanceParams, CreateTokenParams, SellQuoteParams, SellTokenParams, SwapParams, TransferParams,
};

/// Error body shape shared by all failures.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: bool,
    detail: String,
}

/// Render a success payload as `{"result": ...}`.
fn ok<T: Serialize>(intent: &'static str, value: T) -> Response {
    metrics::record_operation(intent, "success");
    Json(json!({ "result": value })).into_response()
}

/// Render a pipeline failure with its taxonomy-mapped status code.
fn fail(intent: &'static str, error: PipelineError) -> Response {
    let status = match &error {
        PipelineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::Upstream { service, .. } => {
            metrics::record_upstream_error(*service);
            StatusCode::BAD_GATEWAY
        }
        PipelineError::ChainRejection(_) => StatusCode::UNPROCESSABLE_ENTITY,
        // The transaction may still mine; the hash is in the detail.
        PipelineError::Indeterminate(_) => StatusCode::ACCEPTED,
    };

    metrics::record_operation(intent, error.category());
    tracing::warn!(intent, category = error.category(), detail = %error, "Operation failed");

    (status, Json(ErrorBody { error: true, detail: error.to_string() })).into_response()
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    Json(json!({
        "status": "ok",
        "network": state.config.network,
        "chain_id": state.orchestrator.chain().chain_id(),
    }))
    .into_response()
}

/// GET /networks - list the named network profiles.
pub async fn list_networks(State(state): State<AppState>) -> Response {
    let networks: Vec<_> = state
        .config
        .networks
        .iter()
        .map(|(name, network)| {
            json!({
                "name": name,
                "chain_id": network.chain_id,
                "explorer_url": network.explorer_url,
                "native_symbol": network.native_symbol,
                "selected": *name == state.config.network,
            })
        })
        .collect();
    Json(json!({ "result": networks })).into_response()
}

/// GET /balance
pub async fn get_balance(
    State(state): State<AppState>,
    Query(params): Query<BalanceParams>,
) -> Response {
    match state.orchestrator.get_balance(params).await {
        Ok(outcome) => ok("get_balance", outcome),
        Err(e) => fail("get_balance", e),
    }
}

/// POST /transfer
pub async fn transfer(
    State(state): State<AppState>,
    Json(params): Json<TransferParams>,
) -> Response {
    match state.orchestrator.transfer(params).await {
        Ok(outcome) => ok("transfer", outcome),
        Err(e) => fail("transfer", e),
    }
}

/// POST /swap
pub async fn swap(State(state): State<AppState>, Json(params): Json<SwapParams>) -> Response {
    match state.orchestrator.swap(params).await {
        Ok(outcome) => ok("swap", outcome),
        Err(e) => fail("swap", e),
    }
}

/// GET /swap/quote
pub async fn swap_quote(
    State(state): State<AppState>,
    Query(params): Query<SwapParams>,
) -> Response {
    match state.orchestrator.swap_quote(params).await {
        Ok(outcome) => ok("swap_quote", outcome),
        Err(e) => fail("swap_quote", e),
    }
}

/// POST /tokens - launch a token on the bonding curve.
pub async fn create_token(
    State(state): State<AppState>,
    Json(params): Json<CreateTokenParams>,
) -> Response {
    match state.orchestrator.create_token(params).await {
        Ok(outcome) => ok("create_token", outcome),
        Err(e) => fail("create_token", e),
    }
}

/// POST /tokens/sell
pub async fn sell_token(
    State(state): State<AppState>,
    Json(params): Json<SellTokenParams>,
) -> Response {
    match state.orchestrator.sell_token(params).await {
        Ok(outcome) => ok("sell_token", outcome),
        Err(e) => fail("sell_token", e),
    }
}

/// GET /tokens/sell-quote
pub async fn sell_quote(
    State(state): State<AppState>,
    Query(params): Query<SellQuoteParams>,
) -> Response {
    match state.orchestrator.get_sell_quote(params).await {
        Ok(outcome) => ok("get_sell_quote", outcome),
        Err(e) => fail("get_sell_quote", e),
    }
}

/// Query for GET /tokens/lookup.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub ticker: String,
}

/// GET /tokens/lookup
pub async fn lookup_token(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Response {
    match state.orchestrator.lookup_token(&query.ticker).await {
        Ok(outcome) => ok("lookup_token", outcome),
        Err(e) => fail("lookup_token", e),
    }
}

/// POST /loop/start
pub async fn start_loop(State(state): State<AppState>) -> Response {
    if state.poller.start() {
        Json(json!({ "result": "started" })).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            Json(ErrorBody { error: true, detail: "loop already running".to_string() }),
        )
            .into_response()
    }
}

/// POST /loop/stop
pub async fn stop_loop(State(state): State<AppState>) -> Response {
    if state.poller.stop() {
        Json(json!({ "result": "stopped" })).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            Json(ErrorBody { error: true, detail: "loop is not running".to_string() }),
        )
            .into_response()
    }
}
