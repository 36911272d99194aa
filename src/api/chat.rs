//! Demo-mode chat endpoint
//!
//! Answers without an LLM behind it: a keyword match picks a canned reply and
//! the numbers come straight from the quote engine.

use axum::{
    extract::{Json as AxumJson, State as AxumState},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::quotes::{ApiError, ApiResult};
use super::AppState;
use crate::quote::engine::group_thousands;
use crate::quote::QuoteEngine;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn post_chat(
    AxumState(state): AxumState<AppState>,
    AxumJson(request): AxumJson<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".into()))?;

    info!(chars = message.chars().count(), "📩 chat message received");
    let response = demo_reply(&state.engine, &message);

    Ok(Json(ChatResponse { response }))
}

/// Canned reply for a free-text message.
pub fn demo_reply(engine: &QuoteEngine, message: &str) -> String {
    let lower = message.to_lowercase();

    if lower.contains("rate") {
        return rate_reply(engine);
    }
    if lower.contains("send") || lower.contains("보내") {
        return match extract_amount(message) {
            Some(amount) => send_reply(engine, amount),
            None => "💸 How much would you like to send? Try \"Send $500 to Korea\".".to_string(),
        };
    }

    help_reply()
}

fn rate_reply(engine: &QuoteEngine) -> String {
    let own = &engine.config().own_route;
    format!(
        "📊 **Current Exchange Rate**\n\n\
         💱 $1 USD = ₩{} KRW\n\n\
         **Via KRWQ Stablecoin:**\n\
         • Rate: 1 KRWQ = 1 KRW (1:1 peg)\n\
         • Fee: ~{:.1}% (swap) + ~${:.2} (gas)\n\
         • Speed: {}\n\n\
         KRWQ gives you the best rate with instant settlement! 🚀",
        group_thousands(engine.rate().value().round() as i64),
        own.swap_fee_fraction * 100.0,
        own.gas_usd,
        own.delivery_time,
    )
}

fn send_reply(engine: &QuoteEngine, amount: f64) -> String {
    let sim = match engine.simulate_transaction(amount, None, None) {
        Ok(sim) => sim.simulation,
        Err(e) => return format!("⚠️ I couldn't quote ${}: {}", amount, e),
    };
    let own = &engine.config().own_route;

    format!(
        "💸 **REMIT-AI Quote for ${}**\n\n\
         **You send:** ${} USD\n\
         **You receive:** ₩{} KRWQ\n\n\
         **Fee Breakdown:**\n\
         • Swap fee: ${:.2} ({:.1}%)\n\
         • Gas fee: ${:.2}\n\
         • **Total fees: ${:.2}**\n\n\
         **Route:** {}\n\
         **Time:** {}\n\n\
         Would you like to proceed? 🚀",
        amount,
        amount,
        group_thousands(sim.output_amount),
        sim.fees.swap_fee,
        own.swap_fee_fraction * 100.0,
        sim.fees.gas_fee,
        sim.fees.total_fee,
        sim.route,
        own.delivery_time,
    )
}

fn help_reply() -> String {
    "I'm REMIT-AI, your Korean Won remittance assistant!\n\n\
     I can help you:\n\
     • 💱 Check USD/KRW exchange rates\n\
     • 💰 Get quotes for sending money to Korea\n\
     • 🏦 Compare with traditional bank fees\n\n\
     Try: \"Send $500 to Korea\" or \"What's the current rate?\""
        .to_string()
}

/// First number in the text, with thousands separators removed.
/// `"send $1,250.50 home"` -> `Some(1250.5)`
fn extract_amount(message: &str) -> Option<f64> {
    let start = message.find(|c: char| c.is_ascii_digit())?;
    let mut digits = String::new();
    let mut seen_dot = false;

    for c in message[start..].chars() {
        match c {
            '0'..='9' => digits.push(c),
            ',' => {}
            '.' if !seen_dot => {
                seen_dot = true;
                digits.push(c);
            }
            _ => break,
        }
    }

    digits.trim_end_matches('.').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_amount() {
        assert_eq!(extract_amount("Send $500 to Korea"), Some(500.0));
        assert_eq!(extract_amount("send 1,000 please"), Some(1000.0));
        assert_eq!(extract_amount("send $1,250.50 home"), Some(1250.5));
        assert_eq!(extract_amount("send 20."), Some(20.0));
        assert_eq!(extract_amount("send money"), None);
    }

    #[test]
    fn test_rate_reply() {
        let reply = demo_reply(&QuoteEngine::reference(), "What's the current RATE?");
        assert!(reply.contains("$1 USD = ₩1,380 KRW"));
        assert!(reply.contains("~0.3% (swap) + ~$0.50 (gas)"));
    }

    #[test]
    fn test_send_reply_uses_engine_numbers() {
        let reply = demo_reply(&QuoteEngine::reference(), "Send $500 to Korea");
        assert!(reply.contains("₩687,240 KRWQ"));
        assert!(reply.contains("Total fees: $2.00"));
        assert!(reply.contains("USD → USDC → Aerodrome → KRWQ"));
    }

    #[test]
    fn test_korean_send_keyword() {
        let reply = demo_reply(&QuoteEngine::reference(), "한국에 1000달러 보내줘");
        assert!(reply.contains("REMIT-AI Quote for $1000"));
    }

    #[test]
    fn test_send_without_amount_asks_instead_of_guessing() {
        let reply = demo_reply(&QuoteEngine::reference(), "I want to send money");
        assert!(reply.contains("How much would you like to send?"));
    }

    #[test]
    fn test_send_rejected_amount_is_reported() {
        let reply = demo_reply(&QuoteEngine::reference(), "send $0");
        assert!(reply.contains("couldn't quote"));
        assert!(reply.contains("invalid amount"));
    }

    #[test]
    fn test_help_reply_default() {
        let reply = demo_reply(&QuoteEngine::reference(), "hello");
        assert!(reply.starts_with("I'm REMIT-AI"));
    }
}
