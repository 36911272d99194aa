//! Tool Dispatch
//!
//! Typed entry points for the conversational layer. A tool call is a name plus
//! a JSON input object; inputs and outputs use camelCase field names.
//!
//! ```ignore
//! let call: ToolCall = serde_json::from_str(r#"{"tool":"get_swap_quote","input":{"amountUsd":500}}"#)?;
//! let output = dispatch(&engine, &call)?;
//! ```

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::quote::{PoolPreference, QuoteEngine, QuoteError, TransferMethod};

/// Name and description of every tool, in listing order.
pub const TOOLS: &[(&str, &str)] = &[
    ("get_exchange_rate", "Get the current USD to KRW (Korean Won) exchange rate"),
    ("get_krwq_price", "Get the current KRWQ stablecoin price. KRWQ is pegged 1:1 to Korean Won."),
    ("get_swap_quote", "Quote a USD to KRWQ swap with fees, slippage and the best pool"),
    ("get_liquidity_pools", "List the KRWQ liquidity pools available for swapping"),
    ("compare_remittance", "Compare REMIT-AI costs with a traditional bank wire to Korea"),
    ("compare_providers", "Compare a given fee and output against a traditional bank wire"),
    ("calculate_conversion", "USD to KRW conversion for one transfer method, including all fees"),
    ("get_frax_route", "Multi-hop swap route: USD -> frxUSD -> KRWQ"),
    ("get_frxusd_info", "Information about the frxUSD stablecoin from Frax Finance"),
    ("simulate_transaction", "Simulate a KRWQ remittance and return execution details"),
    ("generate_transaction_summary", "Human-readable summary of a remittance transaction"),
];

/// A single tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub input: Value,
}

impl ToolCall {
    pub fn new(tool: impl Into<String>, input: Value) -> Self {
        Self {
            tool: tool.into(),
            input,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateInput {
    #[serde(default = "one_dollar")]
    pub amount: f64,
}

fn one_dollar() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountInput {
    pub amount_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteInput {
    pub amount_usd: f64,
    #[serde(default)]
    pub preferred_pool: PoolPreference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareProvidersInput {
    pub amount_usd: f64,
    pub our_fee_total: f64,
    pub our_output: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionInput {
    pub amount_usd: f64,
    #[serde(default)]
    pub method: TransferMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateInput {
    pub amount_usd: f64,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub recipient_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInput {
    pub amount_usd: f64,
    pub amount_krwq: i64,
    pub fees: f64,
    pub route: String,
}

/// Tool dispatch errors
#[derive(Debug, Clone, PartialEq)]
pub enum ToolError {
    UnknownTool(String),
    InvalidInput { tool: String, message: String },
    Quote(QuoteError),
    Output(String),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTool(name) => write!(f, "unknown tool: {}", name),
            Self::InvalidInput { tool, message } => {
                write!(f, "invalid input for {}: {}", tool, message)
            }
            Self::Quote(e) => write!(f, "{}", e),
            Self::Output(msg) => write!(f, "failed to encode tool output: {}", msg),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<QuoteError> for ToolError {
    fn from(err: QuoteError) -> Self {
        ToolError::Quote(err)
    }
}

fn parse_input<T: DeserializeOwned>(call: &ToolCall) -> Result<T, ToolError> {
    // Tools whose fields are all optional accept a missing input
    let input = match &call.input {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(input).map_err(|e| ToolError::InvalidInput {
        tool: call.tool.clone(),
        message: e.to_string(),
    })
}

fn to_output<T: Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Output(e.to_string()))
}

/// Run one tool against the engine and return its JSON output.
pub fn dispatch(engine: &QuoteEngine, call: &ToolCall) -> Result<Value, ToolError> {
    debug!(tool = %call.tool, "dispatching tool call");

    let result = match call.tool.as_str() {
        "get_exchange_rate" => {
            let input: ExchangeRateInput = parse_input(call)?;
            to_output(engine.exchange_rate(input.amount)?)
        }
        "get_krwq_price" => to_output(engine.krwq_price()),
        "get_swap_quote" => {
            let input: SwapQuoteInput = parse_input(call)?;
            to_output(engine.quote_swap(input.amount_usd, &input.preferred_pool)?)
        }
        "get_liquidity_pools" => to_output(serde_json::json!({
            "pools": engine.liquidity_pools(),
        })),
        "compare_remittance" => {
            let input: AmountInput = parse_input(call)?;
            to_output(engine.compare_remittance(input.amount_usd)?)
        }
        "compare_providers" => {
            let input: CompareProvidersInput = parse_input(call)?;
            to_output(engine.compare_providers(
                input.amount_usd,
                input.our_fee_total,
                input.our_output,
            )?)
        }
        "calculate_conversion" => {
            let input: ConversionInput = parse_input(call)?;
            to_output(engine.calculate_conversion(input.amount_usd, input.method)?)
        }
        "get_frax_route" => {
            let input: AmountInput = parse_input(call)?;
            to_output(engine.multi_hop_route(input.amount_usd)?)
        }
        "get_frxusd_info" => to_output(engine.frxusd_info()),
        "simulate_transaction" => {
            let input: SimulateInput = parse_input(call)?;
            to_output(engine.simulate_transaction(
                input.amount_usd,
                input.route.as_deref(),
                input.recipient_address.as_deref(),
            )?)
        }
        "generate_transaction_summary" => {
            let input: SummaryInput = parse_input(call)?;
            to_output(engine.transaction_summary(
                input.amount_usd,
                input.amount_krwq,
                input.fees,
                &input.route,
            )?)
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    };

    if let Err(e) = &result {
        warn!(tool = %call.tool, error = %e, "tool call failed");
    }
    result
}
