//! Quote Engine Configuration
//!
//! Every constant the engine prices with lives here. `QuoteConfig::default()`
//! reproduces the reference tables; a TOML file can override any part of it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::error::QuoteError;
use super::pools::PoolTable;
use super::providers::ProviderTable;
use super::rate::{
    FixedRate, JitteredRate, RateSource, REFERENCE_JITTER_SPREAD, REFERENCE_USD_KRW_RATE,
};

/// Main configuration for the quote engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Gas charged on every pool swap quote (USD)
    pub gas_usd: f64,

    /// Bank wire fee fraction used for the savings block on swap quotes
    pub wire_fee_fraction: f64,

    /// What happens when fees would consume the whole input
    pub shortfall_policy: ShortfallPolicy,

    /// Rate source selection
    pub rate: RateConfig,

    /// Traditional bank wire baseline for provider comparison
    pub traditional: TraditionalBaseline,

    /// Flat pricing of our own route (comparison and simulation)
    pub own_route: OwnRoutePricing,

    /// Liquidity pools, in tie-break order
    pub pools: PoolTable,

    /// Per-method fee structures
    pub providers: ProviderTable,

    /// Multi-hop route steps, in execution order
    pub multi_hop: Vec<HopStep>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            gas_usd: 0.5,
            wire_fee_fraction: 0.05,
            shortfall_policy: ShortfallPolicy::default(),
            rate: RateConfig::default(),
            traditional: TraditionalBaseline::default(),
            own_route: OwnRoutePricing::default(),
            pools: PoolTable::default(),
            providers: ProviderTable::default(),
            multi_hop: HopStep::reference_route(),
        }
    }
}

impl QuoteConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: QuoteConfig = toml::from_str(content).context("Failed to parse quote config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read quote config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid quote config {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize quote config")
    }

    pub fn validate(&self) -> Result<(), QuoteError> {
        let non_negative = [
            ("gas_usd", self.gas_usd),
            ("traditional.flat_fee_usd", self.traditional.flat_fee_usd),
            ("own_route.gas_usd", self.own_route.gas_usd),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(QuoteError::InvalidConfig(format!("{} must be >= 0", name)));
            }
        }

        let fractions = [
            ("wire_fee_fraction", self.wire_fee_fraction),
            ("traditional.fee_fraction", self.traditional.fee_fraction),
            ("traditional.rate_penalty", self.traditional.rate_penalty),
            ("own_route.swap_fee_fraction", self.own_route.swap_fee_fraction),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || !(0.0..1.0).contains(&value) {
                return Err(QuoteError::InvalidConfig(format!("{} must be in [0, 1)", name)));
            }
        }

        if self.multi_hop.is_empty() {
            return Err(QuoteError::InvalidConfig("multi_hop route has no steps".into()));
        }
        for step in &self.multi_hop {
            if !step.fee_fraction.is_finite() || !(0.0..1.0).contains(&step.fee_fraction) {
                return Err(QuoteError::InvalidConfig(format!(
                    "hop {} -> {} fee must be in [0, 1)",
                    step.from, step.to
                )));
            }
        }

        self.pools.validate()?;
        self.providers.validate()?;
        self.rate.build()?;
        Ok(())
    }
}

/// Policy for quotes whose fees exceed the input amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Fail with `QuoteError::FeesExceedAmount`
    #[default]
    Reject,
    /// Report an output amount of zero
    ClampToZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateMode {
    #[default]
    Fixed,
    Jittered,
}

/// Rate source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub mode: RateMode,
    /// KRW per USD
    pub base: f64,
    /// Full jitter width; samples land within base ± spread / 2
    pub spread: f64,
    /// Seed for reproducible jitter. Unseeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            mode: RateMode::Fixed,
            base: REFERENCE_USD_KRW_RATE,
            spread: REFERENCE_JITTER_SPREAD,
            seed: None,
        }
    }
}

impl RateConfig {
    pub fn build(&self) -> Result<Arc<dyn RateSource>, QuoteError> {
        Ok(match (self.mode, self.seed) {
            (RateMode::Fixed, _) => Arc::new(FixedRate::new(self.base)?),
            (RateMode::Jittered, Some(seed)) => {
                Arc::new(JitteredRate::seeded(self.base, self.spread, seed)?)
            }
            (RateMode::Jittered, None) => Arc::new(JitteredRate::unseeded(self.base, self.spread)?),
        })
    }
}

/// Retail bank wire: percentage fee + flat fee, and a worse FX rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraditionalBaseline {
    pub provider: String,
    pub fee_fraction: f64,
    pub flat_fee_usd: f64,
    /// Retail FX haircut applied to the output only (0.02 = 2% worse rate)
    pub rate_penalty: f64,
    pub delivery_time: String,
    pub time_saved: String,
}

impl Default for TraditionalBaseline {
    fn default() -> Self {
        Self {
            provider: "Traditional Bank Wire".into(),
            fee_fraction: 0.05,
            flat_fee_usd: 25.0,
            rate_penalty: 0.02,
            delivery_time: "2-5 business days".into(),
            time_saved: "2-5 days".into(),
        }
    }
}

/// Flat pricing of the KRWQ route, used where no pool is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnRoutePricing {
    pub provider: String,
    pub swap_fee_fraction: f64,
    pub gas_usd: f64,
    pub delivery_time: String,
    pub network: String,
    pub estimated_time: String,
    pub default_route: String,
}

impl Default for OwnRoutePricing {
    fn default() -> Self {
        Self {
            provider: "REMIT-AI (via KRWQ)".into(),
            swap_fee_fraction: 0.003,
            gas_usd: 0.5,
            delivery_time: "< 1 minute".into(),
            network: "Base (Coinbase L2)".into(),
            estimated_time: "< 30 seconds".into(),
            default_route: "USD → USDC → Aerodrome → KRWQ".into(),
        }
    }
}

/// One leg of a multi-hop route. Its fee is charged on the original amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopStep {
    pub from: String,
    pub to: String,
    pub protocol: String,
    pub fee_fraction: f64,
}

impl HopStep {
    pub fn reference_route() -> Vec<HopStep> {
        vec![
            HopStep {
                from: "USD/USDC".into(),
                to: "frxUSD".into(),
                protocol: "Frax Swap".into(),
                fee_fraction: 0.001,
            },
            HopStep {
                from: "frxUSD".into(),
                to: "KRWQ".into(),
                protocol: "Aerodrome/Fraxtal".into(),
                fee_fraction: 0.0025,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = QuoteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pools.pools().len(), 2);
        assert_eq!(config.multi_hop.len(), 2);
        assert_eq!(config.traditional.rate_penalty, 0.02);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = QuoteConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = QuoteConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = QuoteConfig::from_toml_str(
            r#"
            gas_usd = 1.25
            shortfall_policy = "clamp_to_zero"

            [rate]
            mode = "jittered"
            seed = 9
            "#,
        )
        .unwrap();

        assert_eq!(parsed.gas_usd, 1.25);
        assert_eq!(parsed.shortfall_policy, ShortfallPolicy::ClampToZero);
        assert_eq!(parsed.rate.mode, RateMode::Jittered);
        assert_eq!(parsed.rate.base, 1380.0);
        assert_eq!(parsed.pools, PoolTable::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(QuoteConfig::from_toml_str("gas_usd = -1.0").is_err());
        assert!(QuoteConfig::from_toml_str("wire_fee_fraction = 1.5").is_err());
        assert!(QuoteConfig::from_toml_str("[rate]\nbase = 0.0").is_err());
        assert!(QuoteConfig::from_toml_str("multi_hop = []").is_err());
        assert!(QuoteConfig::from_toml_str("pools = []").is_err());
    }
}
