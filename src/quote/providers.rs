//! Provider fee structures
//! Transfer fee + FX markup + delivery time for each way of getting USD to KRW.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::QuoteError;

/// Ways to move USD into KRW.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TransferMethod {
    /// Our own route: USDC -> KRWQ on an L2 pool
    #[default]
    #[serde(alias = "remit-ai")]
    Own,
    Bank,
    WesternUnion,
    Wise,
}

impl TransferMethod {
    pub const ALL: [TransferMethod; 4] = [
        TransferMethod::Own,
        TransferMethod::Bank,
        TransferMethod::WesternUnion,
        TransferMethod::Wise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransferMethod::Own => "own",
            TransferMethod::Bank => "bank",
            TransferMethod::WesternUnion => "western-union",
            TransferMethod::Wise => "wise",
        }
    }
}

impl FromStr for TransferMethod {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "own" | "remit-ai" => Ok(TransferMethod::Own),
            "bank" => Ok(TransferMethod::Bank),
            "western-union" => Ok(TransferMethod::WesternUnion),
            "wise" => Ok(TransferMethod::Wise),
            _ => Err(QuoteError::UnknownMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fee structure for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderFeeStructure {
    pub method: TransferMethod,
    /// Label shown to users, e.g. "REMIT-AI (KRWQ)"
    pub display_name: String,
    /// Flat transfer or gas fee in USD
    pub transfer_fee_usd: f64,
    /// FX markup over the base rate (0.05 = 5%)
    pub markup_fraction: f64,
    pub delivery_time: String,
}

impl ProviderFeeStructure {
    fn new(
        method: TransferMethod,
        display_name: &str,
        transfer_fee_usd: f64,
        markup_fraction: f64,
        delivery_time: &str,
    ) -> Self {
        Self {
            method,
            display_name: display_name.to_string(),
            transfer_fee_usd,
            markup_fraction,
            delivery_time: delivery_time.to_string(),
        }
    }
}

/// Provider fee table, one entry per method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderTable(Vec<ProviderFeeStructure>);

impl ProviderTable {
    pub fn new(entries: Vec<ProviderFeeStructure>) -> Result<Self, QuoteError> {
        let table = Self(entries);
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), QuoteError> {
        for (i, structure) in self.0.iter().enumerate() {
            let method = structure.method;
            if self.0[..i].iter().any(|other| other.method == method) {
                return Err(QuoteError::InvalidConfig(format!(
                    "duplicate provider entry: {}",
                    method
                )));
            }
            if !structure.transfer_fee_usd.is_finite() || structure.transfer_fee_usd < 0.0 {
                return Err(QuoteError::InvalidConfig(format!(
                    "{} transfer fee must be >= 0",
                    method
                )));
            }
            let m = structure.markup_fraction;
            if !m.is_finite() || !(0.0..1.0).contains(&m) {
                return Err(QuoteError::InvalidConfig(format!(
                    "{} markup must be in [0, 1)",
                    method
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, method: TransferMethod) -> Result<&ProviderFeeStructure, QuoteError> {
        self.0
            .iter()
            .find(|s| s.method == method)
            .ok_or_else(|| QuoteError::UnknownMethod(method.to_string()))
    }

    pub fn entries(&self) -> &[ProviderFeeStructure] {
        &self.0
    }
}

impl Default for ProviderTable {
    fn default() -> Self {
        use TransferMethod::*;
        Self(vec![
            ProviderFeeStructure::new(Own, "REMIT-AI (KRWQ)", 0.5, 0.003, "< 1 minute"),
            ProviderFeeStructure::new(Bank, "BANK", 25.0, 0.05, "2-5 business days"),
            ProviderFeeStructure::new(WesternUnion, "WESTERN-UNION", 10.0, 0.04, "1-3 business days"),
            ProviderFeeStructure::new(Wise, "WISE", 5.0, 0.01, "1-2 business days"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_method_is_own_route() {
        assert_eq!(TransferMethod::default(), TransferMethod::Own);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("bank".parse::<TransferMethod>().unwrap(), TransferMethod::Bank);
        assert_eq!("remit-ai".parse::<TransferMethod>().unwrap(), TransferMethod::Own);
        assert_eq!(
            "Western-Union".parse::<TransferMethod>().unwrap(),
            TransferMethod::WesternUnion
        );
        assert_eq!(
            "paypal".parse::<TransferMethod>(),
            Err(QuoteError::UnknownMethod("paypal".into()))
        );
    }

    #[test]
    fn test_method_serde_alias() {
        let m: TransferMethod = serde_json::from_str("\"remit-ai\"").unwrap();
        assert_eq!(m, TransferMethod::Own);
        assert_eq!(serde_json::to_string(&TransferMethod::WesternUnion).unwrap(), "\"western-union\"");
        assert!(serde_json::from_str::<TransferMethod>("\"paypal\"").is_err());
    }

    #[test]
    fn test_default_table_covers_every_method() {
        let table = ProviderTable::default();
        for method in TransferMethod::ALL {
            assert!(table.get(method).is_ok(), "missing {}", method);
        }
        let bank = table.get(TransferMethod::Bank).unwrap();
        assert_eq!(bank.transfer_fee_usd, 25.0);
        assert_eq!(bank.markup_fraction, 0.05);
    }

    #[test]
    fn test_missing_method_is_unknown() {
        let table = ProviderTable::new(vec![ProviderFeeStructure::new(
            TransferMethod::Wise,
            "WISE",
            5.0,
            0.01,
            "1-2 business days",
        )])
        .unwrap();
        assert_eq!(
            table.get(TransferMethod::Bank),
            Err(QuoteError::UnknownMethod("bank".into()))
        );
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let mut entries = ProviderTable::default().entries().to_vec();
        entries.push(entries[0].clone());
        assert!(ProviderTable::new(entries).is_err());
    }
}
