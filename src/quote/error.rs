//! Quote engine errors

/// Errors returned by quote engine operations.
///
/// Every error is terminal for the call that produced it; nothing is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// Requested USD amount is zero, negative or not finite
    InvalidAmount(f64),
    /// Rate is not a finite value above zero
    InvalidRate(f64),
    /// Transfer method outside the provider table
    UnknownMethod(String),
    /// Pool preference outside the pool table
    UnknownPool(String),
    /// Percentage requested against a zero baseline
    DivisionUndefined,
    /// Fees consume the whole input under `ShortfallPolicy::Reject`
    FeesExceedAmount { amount_usd: f64, fees_usd: f64 },
    /// Configuration failed validation
    InvalidConfig(String),
}

impl std::fmt::Display for QuoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount(a) => write!(f, "invalid amount: {} (must be > 0 USD)", a),
            Self::InvalidRate(r) => write!(f, "invalid rate: {} (must be > 0 KRW per USD)", r),
            Self::UnknownMethod(m) => write!(f, "unknown transfer method: {}", m),
            Self::UnknownPool(p) => write!(f, "unknown pool: {}", p),
            Self::DivisionUndefined => write!(f, "savings percentage undefined for a zero fee baseline"),
            Self::FeesExceedAmount {
                amount_usd,
                fees_usd,
            } => write!(
                f,
                "fees ${:.2} exceed amount ${:.2}",
                fees_usd, amount_usd
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid quote config: {}", msg),
        }
    }
}

impl std::error::Error for QuoteError {}

/// Reject amounts that are not strictly positive.
pub(crate) fn validate_amount(amount_usd: f64) -> Result<f64, QuoteError> {
    if amount_usd.is_finite() && amount_usd > 0.0 {
        Ok(amount_usd)
    } else {
        Err(QuoteError::InvalidAmount(amount_usd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount(500.0), Ok(500.0));
        assert_eq!(validate_amount(0.0), Err(QuoteError::InvalidAmount(0.0)));
        assert_eq!(validate_amount(-1.0), Err(QuoteError::InvalidAmount(-1.0)));
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = QuoteError::FeesExceedAmount {
            amount_usd: 20.0,
            fees_usd: 26.0,
        };
        assert_eq!(err.to_string(), "fees $26.00 exceed amount $20.00");
        assert_eq!(
            QuoteError::UnknownMethod("paypal".into()).to_string(),
            "unknown transfer method: paypal"
        );
    }
}
