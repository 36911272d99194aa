//! Liquidity pools
//! Modeled venues for the USDC -> KRWQ leg, each with its own fee and slippage.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::QuoteError;

/// A modeled liquidity venue. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// Stable identifier, e.g. `aerodrome-krwq-usdc`
    pub id: String,
    /// Short preference key accepted alongside the id, e.g. `aerodrome`
    pub key: String,
    pub name: String,
    pub network: String,
    /// Total value locked in USD (informational only)
    pub tvl_usd: f64,
    /// Swap fee as a fraction (0.003 = 0.3%)
    pub fee_fraction: f64,
    /// Modeled price impact as a fraction of the trade
    pub slippage_fraction: f64,
}

impl Pool {
    pub fn aerodrome_krwq_usdc() -> Self {
        Self {
            id: "aerodrome-krwq-usdc".into(),
            key: "aerodrome".into(),
            name: "Aerodrome KRWQ/USDC".into(),
            network: "Base".into(),
            tvl_usd: 5_000_000.0,
            fee_fraction: 0.003,
            slippage_fraction: 0.001,
        }
    }

    pub fn frax_krwq_frxusd() -> Self {
        Self {
            id: "frax-krwq-frxusd".into(),
            key: "frax".into(),
            name: "Frax KRWQ/frxUSD".into(),
            network: "Fraxtal".into(),
            tvl_usd: 2_000_000.0,
            fee_fraction: 0.0025,
            slippage_fraction: 0.0015,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name) || self.key.eq_ignore_ascii_case(name)
    }
}

/// Which pool the caller wants quoted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PoolPreference {
    /// Lowest fee fraction wins
    #[default]
    Auto,
    /// Pool id or short key
    Named(String),
}

impl PoolPreference {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl From<String> for PoolPreference {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Named(trimmed.to_string())
        }
    }
}

impl From<PoolPreference> for String {
    fn from(value: PoolPreference) -> Self {
        match value {
            PoolPreference::Auto => "auto".to_string(),
            PoolPreference::Named(name) => name,
        }
    }
}

impl FromStr for PoolPreference {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

/// Ordered, non-empty pool table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolTable(Vec<Pool>);

impl PoolTable {
    pub fn new(pools: Vec<Pool>) -> Result<Self, QuoteError> {
        let table = Self(pools);
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), QuoteError> {
        if self.0.is_empty() {
            return Err(QuoteError::InvalidConfig("pool table is empty".into()));
        }
        for (i, pool) in self.0.iter().enumerate() {
            let fractions = [pool.fee_fraction, pool.slippage_fraction];
            if fractions.iter().any(|f| !f.is_finite() || !(0.0..1.0).contains(f)) {
                return Err(QuoteError::InvalidConfig(format!(
                    "pool {} fractions must be in [0, 1)",
                    pool.id
                )));
            }
            if self.0[..i]
                .iter()
                .any(|other| other.matches(&pool.id) || other.matches(&pool.key))
            {
                return Err(QuoteError::InvalidConfig(format!(
                    "duplicate pool id or key: {}",
                    pool.id
                )));
            }
        }
        Ok(())
    }

    pub fn pools(&self) -> &[Pool] {
        &self.0
    }

    /// Resolve a preference to a pool.
    ///
    /// `Auto` picks the strictly lowest fee fraction; on an exact tie the
    /// earlier pool in table order is kept.
    pub fn select(&self, preference: &PoolPreference) -> Result<&Pool, QuoteError> {
        match preference {
            PoolPreference::Auto => {
                let mut best = self
                    .0
                    .first()
                    .ok_or_else(|| QuoteError::UnknownPool("auto".into()))?;
                for pool in &self.0[1..] {
                    if pool.fee_fraction < best.fee_fraction {
                        best = pool;
                    }
                }
                Ok(best)
            }
            PoolPreference::Named(name) => self
                .0
                .iter()
                .find(|p| p.matches(name))
                .ok_or_else(|| QuoteError::UnknownPool(name.clone())),
        }
    }
}

impl Default for PoolTable {
    fn default() -> Self {
        Self(vec![Pool::aerodrome_krwq_usdc(), Pool::frax_krwq_frxusd()])
    }
}
