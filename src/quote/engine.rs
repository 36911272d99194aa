//! Quote Engine
//! Mission: Itemized USD -> KRW quotes where every fee is accounted for
//! Philosophy: Same inputs, same rate, same numbers

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::config::{QuoteConfig, ShortfallPolicy};
use super::error::{validate_amount, QuoteError};
use super::pools::{Pool, PoolPreference};
use super::providers::TransferMethod;
use super::rate::{FixedRate, Rate, RateSource};
use super::types::*;

const NEXT_STEPS: [&str; 4] = [
    "Connect wallet to confirm transaction",
    "Approve USDC spending",
    "Execute swap on Aerodrome",
    "KRWQ will be delivered to recipient address",
];

/// Rounding applied when converting a USD net amount into whole KRW.
///
/// Pool and route quotes floor; provider conversions round to nearest.
#[derive(Debug, Clone, Copy)]
enum Rounding {
    Floor,
    Nearest,
}

/// Pricing engine over a static configuration and an injected rate source
pub struct QuoteEngine {
    config: QuoteConfig,
    rate_source: Arc<dyn RateSource>,
}

impl QuoteEngine {
    pub fn new(
        config: QuoteConfig,
        rate_source: Arc<dyn RateSource>,
    ) -> Result<Self, QuoteError> {
        config.validate()?;
        Ok(Self {
            config,
            rate_source,
        })
    }

    /// Engine using the rate source described by `config.rate`
    pub fn from_config(config: QuoteConfig) -> Result<Self, QuoteError> {
        let rate_source = config.rate.build()?;
        Self::new(config, rate_source)
    }

    /// Reference tables at the fixed 1380 KRW/USD rate
    pub fn reference() -> Self {
        Self {
            config: QuoteConfig::default(),
            rate_source: Arc::new(FixedRate::reference()),
        }
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Current KRW per USD from the injected source
    pub fn rate(&self) -> Rate {
        self.rate_source.current_rate()
    }

    pub fn select_pool(&self, preference: &PoolPreference) -> Result<&Pool, QuoteError> {
        self.config.pools.select(preference)
    }

    /// Quote a USD -> KRWQ swap through one pool
    ///
    /// # Arguments
    /// * `amount_usd` - Amount to send, must be > 0
    /// * `preference` - Pool id/key, or `Auto` for the lowest fee
    ///
    /// # Returns
    /// Itemized quote; output is floored to whole KRWQ
    pub fn quote_swap(
        &self,
        amount_usd: f64,
        preference: &PoolPreference,
    ) -> Result<SwapQuote, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        let pool = self.select_pool(preference)?;
        let rate = self.rate().value();

        let fee = amount_usd * pool.fee_fraction;
        let slippage = amount_usd * pool.slippage_fraction;
        let gas = self.config.gas_usd;
        let fees = FeeBreakdown::new(fee, pool.fee_fraction, slippage, gas);

        let net_usd = amount_usd - fee - slippage - gas;
        let output_amount = self.settle(
            amount_usd,
            fees.total_cost_usd,
            net_usd,
            Rounding::Floor,
            |net| net * rate,
        )?;

        let traditional_wire_fee = amount_usd * self.config.wire_fee_fraction;
        let saved_amount = traditional_wire_fee - fees.total_cost_usd;
        let savings = WireSavings {
            traditional_wire_fee,
            our_fee: fees.total_cost_usd,
            saved_amount,
            saved_percent: percent_of(saved_amount, traditional_wire_fee)?,
        };

        debug!(
            amount_usd,
            pool = %pool.id,
            output_amount,
            total_cost_usd = fees.total_cost_usd,
            "swap quote computed"
        );

        Ok(SwapQuote {
            input_amount: amount_usd,
            input_currency: INPUT_CURRENCY.into(),
            output_amount,
            output_currency: OUTPUT_CURRENCY.into(),
            exchange_rate: rate,
            fees,
            route: format!("USD → USDC → {} → KRWQ", pool.name),
            network: pool.network.clone(),
            pool_id: pool.id.clone(),
            savings,
        })
    }

    /// Compare our fee and output against the traditional bank baseline
    ///
    /// # Arguments
    /// * `amount_usd` - Amount sent, must be > 0
    /// * `our_fee_total` - Our total fee in USD
    /// * `our_output` - KRW (or KRWQ) we deliver
    pub fn compare_providers(
        &self,
        amount_usd: f64,
        our_fee_total: f64,
        our_output: i64,
    ) -> Result<ComparisonResult, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        self.compare_at(self.rate().value(), amount_usd, our_fee_total, our_output)
    }

    /// Price our own route at its flat fee and compare it with the bank baseline
    pub fn compare_remittance(&self, amount_usd: f64) -> Result<ComparisonResult, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        let rate = self.rate().value();
        let own = &self.config.own_route;

        let our_fee = amount_usd * own.swap_fee_fraction + own.gas_usd;
        let our_output = self.settle(
            amount_usd,
            our_fee,
            amount_usd - our_fee,
            Rounding::Floor,
            |net| net * rate,
        )?;

        self.compare_at(rate, amount_usd, our_fee, our_output)
    }

    fn compare_at(
        &self,
        rate: f64,
        amount_usd: f64,
        our_fee_total: f64,
        our_output: i64,
    ) -> Result<ComparisonResult, QuoteError> {
        if !our_fee_total.is_finite() || our_fee_total < 0.0 {
            return Err(QuoteError::InvalidAmount(our_fee_total));
        }
        if our_output < 0 {
            return Err(QuoteError::InvalidAmount(our_output as f64));
        }

        let baseline = &self.config.traditional;
        let traditional_fee = amount_usd * baseline.fee_fraction + baseline.flat_fee_usd;
        let penalty = 1.0 - baseline.rate_penalty;
        let traditional_output = self.settle(
            amount_usd,
            traditional_fee,
            amount_usd - traditional_fee,
            Rounding::Floor,
            |net| net * rate * penalty,
        )?;

        let saved_usd = traditional_fee - our_fee_total;
        let percent_saved = percent_of(saved_usd, traditional_fee)?;
        let saved_krw = our_output
            .checked_sub(traditional_output)
            .ok_or(QuoteError::InvalidAmount(our_output as f64))?;

        debug!(
            amount_usd,
            traditional_fee,
            our_fee_total,
            traditional_output,
            our_output,
            "provider comparison computed"
        );

        Ok(ComparisonResult {
            amount: amount_usd,
            traditional: ProviderQuote {
                provider: baseline.provider.clone(),
                fee: traditional_fee,
                fee_percent: traditional_fee / amount_usd * 100.0,
                delivery_time: baseline.delivery_time.clone(),
                final_amount_krw: traditional_output,
            },
            ours: ProviderQuote {
                provider: self.config.own_route.provider.clone(),
                fee: our_fee_total,
                fee_percent: our_fee_total / amount_usd * 100.0,
                delivery_time: self.config.own_route.delivery_time.clone(),
                final_amount_krw: our_output,
            },
            savings: Savings {
                amount_usd: saved_usd,
                amount_krw: saved_krw,
                percent_saved,
                time_saved: baseline.time_saved.clone(),
            },
        })
    }

    /// Convert through one provider. Receive amount is rounded to nearest KRW.
    pub fn calculate_conversion(
        &self,
        amount_usd: f64,
        method: TransferMethod,
    ) -> Result<ConversionQuote, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        self.conversion_at(self.rate().value(), amount_usd, method)
    }

    /// Every configured provider at a single rate sample, in table order
    pub fn calculate_all_conversions(
        &self,
        amount_usd: f64,
    ) -> Result<Vec<ConversionQuote>, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        let rate = self.rate().value();
        self.config
            .providers
            .entries()
            .iter()
            .map(|s| self.conversion_at(rate, amount_usd, s.method))
            .collect()
    }

    fn conversion_at(
        &self,
        rate: f64,
        amount_usd: f64,
        method: TransferMethod,
    ) -> Result<ConversionQuote, QuoteError> {
        let structure = self.config.providers.get(method)?;

        let transfer_fee = structure.transfer_fee_usd;
        let exchange_markup = amount_usd * structure.markup_fraction;
        let total_fees = transfer_fee + exchange_markup;
        let effective_rate = rate * (1.0 - structure.markup_fraction);
        let receive_amount = self.settle(
            amount_usd,
            transfer_fee,
            amount_usd - transfer_fee,
            Rounding::Nearest,
            |net| net * effective_rate,
        )?;

        debug!(
            amount_usd,
            method = %method,
            effective_rate,
            receive_amount,
            "conversion computed"
        );

        Ok(ConversionQuote {
            method: structure.display_name.clone(),
            send_amount: amount_usd,
            exchange_rate: effective_rate,
            fees: ConversionFees {
                transfer_fee,
                exchange_markup,
                total_fees,
                fee_percent: total_fees / amount_usd * 100.0,
            },
            receive_amount,
            currency: LOCAL_CURRENCY.into(),
            delivery_time: structure.delivery_time.clone(),
        })
    }

    /// Two-step route through frxUSD. Each hop charges its fee on the
    /// original amount; fees are not deducted between hops.
    pub fn multi_hop_route(&self, amount_usd: f64) -> Result<MultiHopRoute, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        let rate = self.rate().value();

        let route: Vec<RouteStep> = self
            .config
            .multi_hop
            .iter()
            .zip(1u32..)
            .map(|(hop, step)| RouteStep {
                step,
                from: hop.from.clone(),
                to: hop.to.clone(),
                protocol: hop.protocol.clone(),
                fee: amount_usd * hop.fee_fraction,
            })
            .collect();

        let total_fee: f64 = route.iter().map(|s| s.fee).sum();
        let estimated_output = self.settle(
            amount_usd,
            total_fee,
            amount_usd - total_fee,
            Rounding::Floor,
            |net| net * rate,
        )?;

        debug!(
            amount_usd,
            hops = route.len(),
            total_fee,
            estimated_output,
            "multi-hop route computed"
        );

        Ok(MultiHopRoute {
            route,
            total_fee,
            estimated_output,
            output_currency: OUTPUT_CURRENCY.into(),
        })
    }

    /// Dry-run a remittance on our own route
    pub fn simulate_transaction(
        &self,
        amount_usd: f64,
        route: Option<&str>,
        recipient_address: Option<&str>,
    ) -> Result<TransactionSimulation, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        let rate = self.rate().value();
        let own = &self.config.own_route;

        let swap_fee = amount_usd * own.swap_fee_fraction;
        let gas_fee = own.gas_usd;
        let total_fee = swap_fee + gas_fee;
        let output_amount = self.settle(
            amount_usd,
            total_fee,
            amount_usd - total_fee,
            Rounding::Floor,
            |net| net * rate,
        )?;

        let route = route
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(&own.default_route)
            .to_string();
        let transaction_id = simulated_transaction_id();

        debug!(%transaction_id, amount_usd, output_amount, "transaction simulated");

        Ok(TransactionSimulation {
            success: true,
            simulation: Simulation {
                transaction_id,
                status: "SIMULATED".into(),
                input_amount: amount_usd,
                input_currency: INPUT_CURRENCY.into(),
                output_amount,
                output_currency: OUTPUT_CURRENCY.into(),
                route,
                recipient_address: recipient_address.map(str::to_string),
                fees: SimulatedFees {
                    swap_fee,
                    gas_fee,
                    total_fee,
                },
                network: own.network.clone(),
                estimated_time: own.estimated_time.clone(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
            next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Human-readable receipt plus the bank wire comparison
    pub fn transaction_summary(
        &self,
        amount_usd: f64,
        amount_krwq: i64,
        fees_usd: f64,
        route: &str,
    ) -> Result<TransactionSummary, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        if !fees_usd.is_finite() || fees_usd < 0.0 {
            return Err(QuoteError::InvalidAmount(fees_usd));
        }

        let baseline = &self.config.traditional;
        let bank_fee = amount_usd * baseline.fee_fraction + baseline.flat_fee_usd;
        let savings = bank_fee - fees_usd;
        let savings_percent = percent_of(savings, bank_fee)?;

        let summary = format!(
            "\n💸 REMIT-AI Transaction Summary\n\
             ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\
             📤 Sent: ${:.2} USD\n\
             📥 Received: ₩{} KRWQ\n\
             💰 Fees: ${:.2} ({:.2}%)\n\
             🛣️ Route: {}\n\
             ⏱️ Time: {}\n\
             ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n",
            amount_usd,
            group_thousands(amount_krwq),
            fees_usd,
            fees_usd / amount_usd * 100.0,
            route,
            self.config.own_route.delivery_time,
        );

        let comparison = format!(
            "\n🏦 vs Traditional Bank Wire:\n\
             • Bank fees would be: ${:.2}\n\
             • You saved: ${:.2} ({:.1}% less!)\n\
             • Time saved: {}\n\
             \n\
             ✅ Powered by KRWQ (Korean Won stablecoin)\n",
            bank_fee, savings, savings_percent, baseline.delivery_time,
        );

        Ok(TransactionSummary {
            summary,
            comparison,
        })
    }

    /// Plain conversion at the current rate, no fees
    pub fn exchange_rate(&self, amount_usd: f64) -> Result<ExchangeRateQuote, QuoteError> {
        let amount_usd = validate_amount(amount_usd)?;
        let rate = self.rate().value();
        Ok(ExchangeRateQuote {
            rate,
            usd_amount: amount_usd,
            krw_amount: (amount_usd * rate).round() as i64,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: "Forex Market Rate".into(),
        })
    }

    /// KRWQ trades 1:1 with KRW, so its USD price is the USD/KRW rate
    pub fn krwq_price(&self) -> PegInfo {
        let rate = self.rate().value();
        PegInfo {
            krwq_per_usd: rate,
            usd_per_krwq: 1.0 / rate,
            peg: "1 KRWQ = 1 KRW (Korean Won)".into(),
            last_updated: chrono::Utc::now().to_rfc3339(),
            source: "KRWQ Oracle".into(),
        }
    }

    pub fn liquidity_pools(&self) -> Vec<PoolSummary> {
        self.config
            .pools
            .pools()
            .iter()
            .map(|p| PoolSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                network: p.network.clone(),
                tvl: p.tvl_usd,
                fee_percent: p.fee_fraction * 100.0,
            })
            .collect()
    }

    pub fn frxusd_info(&self) -> StablecoinInfo {
        StablecoinInfo::frxusd()
    }

    /// Turn a USD net amount into whole KRW, applying the shortfall policy
    /// when fees exceed the input.
    fn settle(
        &self,
        amount_usd: f64,
        fees_usd: f64,
        net_usd: f64,
        rounding: Rounding,
        to_krw: impl FnOnce(f64) -> f64,
    ) -> Result<i64, QuoteError> {
        if net_usd < 0.0 {
            return match self.config.shortfall_policy {
                ShortfallPolicy::Reject => Err(QuoteError::FeesExceedAmount {
                    amount_usd,
                    fees_usd,
                }),
                ShortfallPolicy::ClampToZero => Ok(0),
            };
        }

        let krw = to_krw(net_usd);
        let whole = match rounding {
            Rounding::Floor => krw.floor(),
            Rounding::Nearest => krw.round(),
        };
        Ok(whole.max(0.0) as i64)
    }
}

impl std::fmt::Debug for QuoteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn percent_of(part: f64, whole: f64) -> Result<f64, QuoteError> {
    if whole == 0.0 {
        return Err(QuoteError::DivisionUndefined);
    }
    Ok(part / whole * 100.0)
}

/// Looks like a shortened tx hash: `0x1a2b3c4d...5e6f`
fn simulated_transaction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("0x{}...{}", &hex[..8], &hex[8..12])
}

pub(crate) fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
