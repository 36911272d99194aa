//! USD/KRW rate sources
//!
//! The engine never reaches for an ambient random function: the rate comes
//! from whatever [`RateSource`] was injected at construction, so tests can pin
//! it with [`FixedRate`] or replay a seeded [`JitteredRate`].

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::error::QuoteError;

/// Reference USD/KRW rate (KRW per 1 USD)
pub const REFERENCE_USD_KRW_RATE: f64 = 1380.0;

/// Reference jitter spread, i.e. ±5 KRW around the base
pub const REFERENCE_JITTER_SPREAD: f64 = 10.0;

/// KRW per 1 USD. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rate(f64);

impl Rate {
    pub fn new(krw_per_usd: f64) -> Result<Self, QuoteError> {
        if krw_per_usd.is_finite() && krw_per_usd > 0.0 {
            Ok(Self(krw_per_usd))
        } else {
            Err(QuoteError::InvalidRate(krw_per_usd))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rate {
    type Error = QuoteError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rate> for f64 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the rate used by every quote operation.
pub trait RateSource: Send + Sync {
    fn current_rate(&self) -> Rate;
}

/// Constant rate. Quotes computed against it are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(pub Rate);

impl FixedRate {
    pub fn new(krw_per_usd: f64) -> Result<Self, QuoteError> {
        Ok(Self(Rate::new(krw_per_usd)?))
    }

    pub fn reference() -> Self {
        Self(Rate(REFERENCE_USD_KRW_RATE))
    }
}

impl RateSource for FixedRate {
    fn current_rate(&self) -> Rate {
        self.0
    }
}

/// Simulated live rate: `round(base + (u - 0.5) * spread)` with `u` uniform in [0, 1).
pub struct JitteredRate {
    base: f64,
    spread: f64,
    rng: Mutex<ChaCha8Rng>,
}

impl JitteredRate {
    /// Seeded source. Same seed, same sequence of rates.
    pub fn seeded(base: f64, spread: f64, seed: u64) -> Result<Self, QuoteError> {
        Self::with_rng(base, spread, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Source seeded from the thread RNG, for live demo use.
    pub fn unseeded(base: f64, spread: f64) -> Result<Self, QuoteError> {
        Self::seeded(base, spread, rand::random())
    }

    fn with_rng(base: f64, spread: f64, rng: ChaCha8Rng) -> Result<Self, QuoteError> {
        if !base.is_finite() || base <= 0.0 {
            return Err(QuoteError::InvalidRate(base));
        }
        if !spread.is_finite() || spread < 0.0 {
            return Err(QuoteError::InvalidConfig(format!(
                "jitter spread must be >= 0, got {}",
                spread
            )));
        }
        // Lowest reachable sample must still round to a positive rate.
        let floor_rate = (base - spread / 2.0).round();
        if floor_rate < 1.0 {
            return Err(QuoteError::InvalidRate(floor_rate));
        }

        Ok(Self {
            base,
            spread,
            rng: Mutex::new(rng),
        })
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }
}

impl RateSource for JitteredRate {
    fn current_rate(&self) -> Rate {
        let u: f64 = self.rng.lock().gen();
        let sample = (self.base + (u - 0.5) * self.spread).round();
        // Bounded below by construction
        Rate(sample.max(1.0))
    }
}

impl std::fmt::Debug for JitteredRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JitteredRate")
            .field("base", &self.base)
            .field("spread", &self.spread)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rejects_non_positive() {
        assert!(Rate::new(0.0).is_err());
        assert!(Rate::new(-1380.0).is_err());
        assert!(Rate::new(f64::NAN).is_err());
        assert_eq!(Rate::new(1380.0).unwrap().value(), 1380.0);
    }

    #[test]
    fn test_fixed_rate_is_constant() {
        let source = FixedRate::reference();
        assert_eq!(source.current_rate().value(), 1380.0);
        assert_eq!(source.current_rate(), source.current_rate());
    }

    #[test]
    fn test_jittered_rate_stays_in_band() {
        let source = JitteredRate::seeded(1380.0, 10.0, 7).unwrap();
        for _ in 0..1000 {
            let rate = source.current_rate().value();
            assert!((1375.0..=1385.0).contains(&rate), "rate {} out of band", rate);
            assert_eq!(rate, rate.round());
        }
    }

    #[test]
    fn test_jittered_rate_reproducible_for_seed() {
        let a = JitteredRate::seeded(1380.0, 10.0, 42).unwrap();
        let b = JitteredRate::seeded(1380.0, 10.0, 42).unwrap();
        let seq_a: Vec<f64> = (0..32).map(|_| a.current_rate().value()).collect();
        let seq_b: Vec<f64> = (0..32).map(|_| b.current_rate().value()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_jittered_rate_rejects_band_reaching_zero() {
        assert!(JitteredRate::seeded(4.0, 10.0, 1).is_err());
        assert!(JitteredRate::seeded(1380.0, -1.0, 1).is_err());
        assert!(JitteredRate::seeded(0.0, 0.0, 1).is_err());
    }

    #[test]
    fn test_rate_deserialize_validates() {
        let ok: Rate = serde_json::from_str("1380.0").unwrap();
        assert_eq!(ok.value(), 1380.0);
        assert!(serde_json::from_str::<Rate>("-5").is_err());
    }
}
