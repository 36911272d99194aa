//! REMIT-AI Quote Server
//! Mission: Quote USD -> KRW remittances through KRWQ and show what a bank wire would cost
//! Philosophy: Every number traceable to a table and a rate
//!
//! Usage:
//!   remit-quote --config quote.toml --port 3001 --log-level debug

use anyhow::{Context, Result};
use axum::middleware;
use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remit_quote::{
    api::{self, AppState},
    config::ServerConfig,
    middleware::request_logging,
    quote::QuoteEngine,
};

#[derive(Parser, Debug)]
#[command(name = "remit-quote")]
#[command(about = "USD to KRW remittance quote server")]
struct Args {
    /// Path to TOML pricing configuration (falls back to QUOTE_CONFIG_PATH)
    #[arg(short, long)]
    config: Option<String>,

    /// HTTP port (falls back to PORT, then 3001)
    #[arg(short, long)]
    port: Option<u16>,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(short, long, env = "REMIT_LOG_LEVEL", default_value = "remit_quote=debug,tower_http=debug")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let args = Args::parse();
    init_tracing(&args.log_level);

    info!("💱 REMIT-AI quote server starting");

    let server = ServerConfig::from_env()?;
    let quote_config = server.load_quote_config(args.config.as_deref())?;
    info!(
        rate_mode = ?quote_config.rate.mode,
        pools = quote_config.pools.pools().len(),
        providers = quote_config.providers.entries().len(),
        "Quote tables loaded"
    );

    let engine = QuoteEngine::from_config(quote_config).context("Failed to build quote engine")?;
    let state = AppState::new(engine);

    let app = api::router(state)
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let port = args.port.unwrap_or(server.port);
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    let _ = dotenv();
}
