//! Quote Engine Module
//! Mission: Price USD -> KRW remittances and compare them against the alternatives
//! Philosophy: A quote is arithmetic over explicit inputs, nothing hidden

pub mod config;
pub mod engine;
pub mod error;
pub mod pools;
pub mod providers;
pub mod rate;
pub mod types;

pub use config::{
    HopStep, OwnRoutePricing, QuoteConfig, RateConfig, RateMode, ShortfallPolicy,
    TraditionalBaseline,
};
pub use engine::QuoteEngine;
pub use error::QuoteError;
pub use pools::{Pool, PoolPreference, PoolTable};
pub use providers::{ProviderFeeStructure, ProviderTable, TransferMethod};
pub use rate::{FixedRate, JitteredRate, Rate, RateSource};
pub use types::*;
