//! Quote API handlers
//! One JSON endpoint per engine operation, plus the generic tool endpoint.

use axum::{
    extract::{Json as AxumJson, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use super::AppState;
use crate::quote::{
    ComparisonResult, ConversionQuote, ExchangeRateQuote, MultiHopRoute, PegInfo, PoolSummary,
    QuoteError, StablecoinInfo, SwapQuote, TransactionSimulation, TransactionSummary,
};
use crate::tools::{
    self, AmountInput, CompareProvidersInput, ConversionInput, ExchangeRateInput, SimulateInput,
    SummaryInput, SwapQuoteInput, ToolCall, ToolError,
};

// ===== Error Handling =====

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Quote(QuoteError),
    Tool(ToolError),
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        ApiError::Quote(err)
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Quote(e) => ApiError::Quote(e),
            other => ApiError::Tool(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Quote(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Tool(err @ ToolError::UnknownTool(_)) => (StatusCode::NOT_FOUND, err.to_string()),
            ApiError::Tool(err @ ToolError::InvalidInput { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Tool(err) => {
                tracing::error!("Tool output error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

// ===== Tools =====

#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub async fn get_tools() -> Json<Vec<ToolInfo>> {
    Json(
        tools::TOOLS
            .iter()
            .map(|&(name, description)| ToolInfo { name, description })
            .collect(),
    )
}

pub async fn post_tool(
    AxumState(state): AxumState<AppState>,
    AxumJson(call): AxumJson<ToolCall>,
) -> ApiResult<Value> {
    Ok(Json(tools::dispatch(&state.engine, &call)?))
}

// ===== Rates & pools =====

pub async fn get_rate(
    AxumState(state): AxumState<AppState>,
    Query(input): Query<ExchangeRateInput>,
) -> ApiResult<ExchangeRateQuote> {
    Ok(Json(state.engine.exchange_rate(input.amount)?))
}

pub async fn get_krwq_price(AxumState(state): AxumState<AppState>) -> Json<PegInfo> {
    Json(state.engine.krwq_price())
}

#[derive(Debug, Serialize)]
pub struct PoolsResponse {
    pub pools: Vec<PoolSummary>,
}

pub async fn get_pools(AxumState(state): AxumState<AppState>) -> Json<PoolsResponse> {
    Json(PoolsResponse {
        pools: state.engine.liquidity_pools(),
    })
}

pub async fn get_frxusd_info(AxumState(state): AxumState<AppState>) -> Json<StablecoinInfo> {
    Json(state.engine.frxusd_info())
}

// ===== Quotes =====

pub async fn post_swap_quote(
    AxumState(state): AxumState<AppState>,
    AxumJson(input): AxumJson<SwapQuoteInput>,
) -> ApiResult<SwapQuote> {
    Ok(Json(
        state
            .engine
            .quote_swap(input.amount_usd, &input.preferred_pool)?,
    ))
}

pub async fn post_compare(
    AxumState(state): AxumState<AppState>,
    AxumJson(input): AxumJson<AmountInput>,
) -> ApiResult<ComparisonResult> {
    Ok(Json(state.engine.compare_remittance(input.amount_usd)?))
}

pub async fn post_compare_providers(
    AxumState(state): AxumState<AppState>,
    AxumJson(input): AxumJson<CompareProvidersInput>,
) -> ApiResult<ComparisonResult> {
    Ok(Json(state.engine.compare_providers(
        input.amount_usd,
        input.our_fee_total,
        input.our_output,
    )?))
}

pub async fn post_conversion(
    AxumState(state): AxumState<AppState>,
    AxumJson(input): AxumJson<ConversionInput>,
) -> ApiResult<ConversionQuote> {
    Ok(Json(
        state
            .engine
            .calculate_conversion(input.amount_usd, input.method)?,
    ))
}

pub async fn post_all_conversions(
    AxumState(state): AxumState<AppState>,
    AxumJson(input): AxumJson<AmountInput>,
) -> ApiResult<Vec<ConversionQuote>> {
    Ok(Json(state.engine.calculate_all_conversions(input.amount_usd)?))
}

pub async fn post_multi_hop(
    AxumState(state): AxumState<AppState>,
    AxumJson(input): AxumJson<AmountInput>,
) -> ApiResult<MultiHopRoute> {
    Ok(Json(state.engine.multi_hop_route(input.amount_usd)?))
}

// ===== Transactions =====

pub async fn post_simulate(
    AxumState(state): AxumState<AppState>,
    AxumJson(input): AxumJson<SimulateInput>,
) -> ApiResult<TransactionSimulation> {
    Ok(Json(state.engine.simulate_transaction(
        input.amount_usd,
        input.route.as_deref(),
        input.recipient_address.as_deref(),
    )?))
}

pub async fn post_summary(
    AxumState(state): AxumState<AppState>,
    AxumJson(input): AxumJson<SummaryInput>,
) -> ApiResult<TransactionSummary> {
    if input.route.trim().is_empty() {
        return Err(ApiError::BadRequest("route is required".into()));
    }
    Ok(Json(state.engine.transaction_summary(
        input.amount_usd,
        input.amount_krwq,
        input.fees,
        &input.route,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let bad = ApiError::from(QuoteError::InvalidAmount(0.0)).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let unknown = ApiError::from(ToolError::UnknownTool("x".into())).into_response();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let output = ApiError::from(ToolError::Output("boom".into())).into_response();
        assert_eq!(output.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_tool_quote_error_unwraps() {
        let err = ApiError::from(ToolError::Quote(QuoteError::DivisionUndefined));
        assert!(matches!(err, ApiError::Quote(QuoteError::DivisionUndefined)));
    }
}
