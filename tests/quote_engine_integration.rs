//! Integration tests for the quote engine
//!
//! Covers configuration loaded from disk, the jittered rate source, and the
//! pricing invariants that must hold for any amount.

use std::io::Write;
use std::sync::Arc;

use proptest::prelude::*;
use remit_quote::quote::{
    FixedRate, JitteredRate, PoolPreference, QuoteConfig, QuoteEngine, QuoteError, RateMode,
    ShortfallPolicy, TransferMethod,
};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_engine_from_toml_file() {
    let file = write_config(
        r#"
gas_usd = 1.0
shortfall_policy = "clamp_to_zero"

[rate]
mode = "fixed"
base = 1300.0

[[pools]]
id = "solo-pool"
key = "solo"
name = "Solo KRWQ/USDC"
network = "Base"
tvl_usd = 1000000.0
fee_fraction = 0.002
slippage_fraction = 0.001
"#,
    );

    let config = QuoteConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.shortfall_policy, ShortfallPolicy::ClampToZero);
    assert_eq!(config.pools.pools().len(), 1);

    let engine = QuoteEngine::from_config(config).unwrap();
    let quote = engine.quote_swap(1000.0, &PoolPreference::Auto).unwrap();

    // 1000 - 2 - 1 - 1 = 996 USD at 1300
    assert_eq!(quote.pool_id, "solo-pool");
    assert_eq!(quote.output_amount, 1_294_800);
    assert_eq!(quote.fees.total_cost_usd, 4.0);

    // Fees larger than the amount clamp instead of failing
    let tiny = engine.quote_swap(0.5, &PoolPreference::Auto).unwrap();
    assert_eq!(tiny.output_amount, 0);
}

#[test]
fn test_written_config_reloads_identically() {
    let config = QuoteConfig::default();
    let file = write_config(&config.to_toml_string().unwrap());
    let reloaded = QuoteConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_invalid_config_file_rejected() {
    let file = write_config("wire_fee_fraction = 1.5\n");
    assert!(QuoteConfig::from_toml_file(file.path()).is_err());
}

#[test]
fn test_reject_policy_reports_shortfall() {
    let engine = QuoteEngine::reference();
    let err = engine.compare_remittance(0.25).unwrap_err();
    assert!(matches!(err, QuoteError::FeesExceedAmount { .. }));
}

#[test]
fn test_seeded_jitter_is_reproducible() {
    let mut config = QuoteConfig::default();
    config.rate.mode = RateMode::Jittered;
    config.rate.seed = Some(2024);

    let a = QuoteEngine::from_config(config.clone()).unwrap();
    let b = QuoteEngine::from_config(config).unwrap();

    for _ in 0..50 {
        let (ra, rb) = (a.rate().value(), b.rate().value());
        assert_eq!(ra, rb);
        assert!((1375.0..=1385.0).contains(&ra), "rate {} out of band", ra);
        assert_eq!(ra, ra.round());
    }
}

#[test]
fn test_injected_rate_source() {
    let engine = QuoteEngine::new(
        QuoteConfig::default(),
        Arc::new(JitteredRate::seeded(1000.0, 0.0, 1).unwrap()),
    )
    .unwrap();

    let conversion = engine.calculate_conversion(100.0, TransferMethod::Wise).unwrap();
    // 95 USD after the transfer fee, markup taken through the rate
    assert_eq!(conversion.exchange_rate, 990.0);
    assert_eq!(conversion.receive_amount, 94_050);
}

#[test]
fn test_fixed_rate_is_idempotent() {
    let engine = QuoteEngine::new(
        QuoteConfig::default(),
        Arc::new(FixedRate::new(1380.0).unwrap()),
    )
    .unwrap();

    let first = engine.multi_hop_route(1000.0).unwrap();
    let second = engine.multi_hop_route(1000.0).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.estimated_output, 1_375_170);
}

proptest! {
    #[test]
    fn prop_swap_fee_components_sum(amount in 1.0f64..1_000_000.0) {
        let engine = QuoteEngine::reference();
        for pool in ["aerodrome", "frax", "auto"] {
            let quote = engine.quote_swap(amount, &pool.parse().unwrap()).unwrap();
            let f = &quote.fees;
            prop_assert_eq!(f.total_cost_usd, f.fee + f.slippage + f.gas);
            prop_assert!(quote.output_amount as f64 <= amount * 1380.0);
        }
    }

    #[test]
    fn prop_swap_output_monotonic(amount in 1.0f64..500_000.0, extra in 1.0f64..500_000.0) {
        let engine = QuoteEngine::reference();
        let low = engine.quote_swap(amount, &PoolPreference::Auto).unwrap();
        let high = engine.quote_swap(amount + extra, &PoolPreference::Auto).unwrap();
        prop_assert!(low.output_amount <= high.output_amount);
    }

    #[test]
    fn prop_auto_pool_has_lowest_fee(amount in 1.0f64..1_000_000.0) {
        let engine = QuoteEngine::reference();
        let auto = engine.quote_swap(amount, &PoolPreference::Auto).unwrap();
        for pool in engine.config().pools.pools() {
            let named = engine
                .quote_swap(amount, &PoolPreference::Named(pool.id.clone()))
                .unwrap();
            prop_assert!(auto.fees.fee <= named.fees.fee);
        }
    }

    #[test]
    fn prop_own_method_beats_bank(amount in 50.0f64..1_000_000.0) {
        let engine = QuoteEngine::reference();
        let own = engine.calculate_conversion(amount, TransferMethod::Own).unwrap();
        let bank = engine.calculate_conversion(amount, TransferMethod::Bank).unwrap();
        prop_assert!(own.receive_amount > bank.receive_amount);
    }
}
