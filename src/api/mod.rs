//! HTTP API
//!
//! # Endpoints
//!
//! - `GET  /health` - Liveness plus the current rate
//! - `POST /chat` - Demo-mode chat reply
//! - `GET  /api/tools` / `POST /api/tools` - List tools / invoke one
//! - `GET  /api/rate?amount=` - Plain USD -> KRW conversion
//! - `GET  /api/krwq/price`, `GET /api/frxusd` - Stablecoin info
//! - `GET  /api/pools` - Liquidity pools
//! - `POST /api/quote/swap`, `/api/quote/compare`, `/api/quote/compare-providers`,
//!   `/api/quote/conversion`, `/api/quote/conversions`, `/api/quote/multi-hop`
//! - `POST /api/transaction/simulate`, `/api/transaction/summary`

pub mod chat;
pub mod quotes;

use axum::{
    extract::State as AxumState,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::quote::QuoteEngine;

pub use chat::{demo_reply, ChatRequest, ChatResponse};
pub use quotes::{ApiError, ApiResult};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QuoteEngine>,
}

impl AppState {
    pub fn new(engine: QuoteEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub async fn health_check(AxumState(state): AxumState<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "agent": "demo-mode",
        "rate": state.engine.rate().value(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// All routes, without middleware. The binary layers logging, tracing and CORS on top.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/tools", get(quotes::get_tools).post(quotes::post_tool))
        .route("/rate", get(quotes::get_rate))
        .route("/krwq/price", get(quotes::get_krwq_price))
        .route("/frxusd", get(quotes::get_frxusd_info))
        .route("/pools", get(quotes::get_pools))
        .route("/quote/swap", post(quotes::post_swap_quote))
        .route("/quote/compare", post(quotes::post_compare))
        .route("/quote/compare-providers", post(quotes::post_compare_providers))
        .route("/quote/conversion", post(quotes::post_conversion))
        .route("/quote/conversions", post(quotes::post_all_conversions))
        .route("/quote/multi-hop", post(quotes::post_multi_hop))
        .route("/transaction/simulate", post(quotes::post_simulate))
        .route("/transaction/summary", post(quotes::post_summary));

    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat::post_chat))
        .nest("/api", api)
        .with_state(state)
}
