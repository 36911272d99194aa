//! Quote records returned by the engine.
//!
//! Field names serialize in camelCase so the JSON matches the tool contracts
//! the chat layer already speaks. All of these are derived values and are
//! recomputed on every request.

use serde::{Deserialize, Serialize};

pub const INPUT_CURRENCY: &str = "USD";
pub const OUTPUT_CURRENCY: &str = "KRWQ";
pub const LOCAL_CURRENCY: &str = "KRW";

/// Additive fee decomposition of a pool swap.
///
/// `total_cost_usd` is always exactly `fee + slippage + gas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub fee: f64,
    pub fee_percent: f64,
    pub slippage: f64,
    #[serde(rename = "estimatedGas")]
    pub gas: f64,
    pub total_cost_usd: f64,
}

impl FeeBreakdown {
    pub fn new(fee: f64, fee_fraction: f64, slippage: f64, gas: f64) -> Self {
        Self {
            fee,
            fee_percent: fee_fraction * 100.0,
            slippage,
            gas,
            total_cost_usd: fee + slippage + gas,
        }
    }
}

/// How a swap quote compares with a plain percentage wire fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSavings {
    pub traditional_wire_fee: f64,
    pub our_fee: f64,
    pub saved_amount: f64,
    pub saved_percent: f64,
}

/// USD -> KRWQ quote through a single pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub input_amount: f64,
    pub input_currency: String,
    pub output_amount: i64,
    pub output_currency: String,
    pub exchange_rate: f64,
    #[serde(flatten)]
    pub fees: FeeBreakdown,
    pub route: String,
    pub network: String,
    pub pool_id: String,
    pub savings: WireSavings,
}

/// One side of a provider comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderQuote {
    pub provider: String,
    pub fee: f64,
    pub fee_percent: f64,
    pub delivery_time: String,
    pub final_amount_krw: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    pub amount_usd: f64,
    pub amount_krw: i64,
    pub percent_saved: f64,
    pub time_saved: String,
}

/// Our pricing against the traditional bank baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub amount: f64,
    pub traditional: ProviderQuote,
    #[serde(rename = "remitai")]
    pub ours: ProviderQuote,
    pub savings: Savings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionFees {
    pub transfer_fee: f64,
    pub exchange_markup: f64,
    pub total_fees: f64,
    pub fee_percent: f64,
}

/// Per-method conversion, comparable across providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionQuote {
    pub method: String,
    pub send_amount: f64,
    /// Rate after the provider's markup
    pub exchange_rate: f64,
    pub fees: ConversionFees,
    pub receive_amount: i64,
    pub currency: String,
    pub delivery_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub step: u32,
    pub from: String,
    pub to: String,
    pub protocol: String,
    pub fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiHopRoute {
    pub route: Vec<RouteStep>,
    pub total_fee: f64,
    pub estimated_output: i64,
    pub output_currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedFees {
    pub swap_fee: f64,
    pub gas_fee: f64,
    pub total_fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub transaction_id: String,
    pub status: String,
    pub input_amount: f64,
    pub input_currency: String,
    pub output_amount: i64,
    pub output_currency: String,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_address: Option<String>,
    pub fees: SimulatedFees,
    pub network: String,
    pub estimated_time: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSimulation {
    pub success: bool,
    pub simulation: Simulation,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub summary: String,
    pub comparison: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateQuote {
    pub rate: f64,
    pub usd_amount: f64,
    pub krw_amount: i64,
    pub timestamp: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PegInfo {
    pub krwq_per_usd: f64,
    pub usd_per_krwq: f64,
    pub peg: String,
    pub last_updated: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    pub id: String,
    pub name: String,
    pub network: String,
    pub tvl: f64,
    pub fee_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StablecoinInfo {
    pub symbol: String,
    pub name: String,
    pub peg: String,
    pub backing: String,
    pub networks: Vec<String>,
    pub website: String,
}

impl StablecoinInfo {
    pub fn frxusd() -> Self {
        Self {
            symbol: "frxUSD".into(),
            name: "Frax USD".into(),
            peg: "1 frxUSD = 1 USD".into(),
            backing: "Fully backed by BlackRock BUIDL, Superstate USTB, and other RWAs".into(),
            networks: ["Ethereum", "Fraxtal", "Base", "Arbitrum", "Polygon"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            website: "https://frax.finance".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_breakdown_sums_components() {
        let fees = FeeBreakdown::new(1.5, 0.003, 0.5, 0.5);
        assert_eq!(fees.total_cost_usd, fees.fee + fees.slippage + fees.gas);
        assert_eq!(fees.total_cost_usd, 2.5);
        assert!((fees.fee_percent - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_swap_quote_json_is_flat_camel_case() {
        let quote = SwapQuote {
            input_amount: 500.0,
            input_currency: INPUT_CURRENCY.into(),
            output_amount: 686_550,
            output_currency: OUTPUT_CURRENCY.into(),
            exchange_rate: 1380.0,
            fees: FeeBreakdown::new(1.5, 0.003, 0.5, 0.5),
            route: "USD → USDC → Aerodrome KRWQ/USDC → KRWQ".into(),
            network: "Base".into(),
            pool_id: "aerodrome-krwq-usdc".into(),
            savings: WireSavings {
                traditional_wire_fee: 25.0,
                our_fee: 2.5,
                saved_amount: 22.5,
                saved_percent: 90.0,
            },
        };

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["outputAmount"], 686_550);
        assert_eq!(json["estimatedGas"], 0.5);
        assert_eq!(json["totalCostUsd"], 2.5);
        assert_eq!(json["savings"]["savedPercent"], 90.0);
        assert!(json.get("fees").is_none());
    }
}
