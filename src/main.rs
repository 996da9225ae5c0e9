use std::sync::Arc;

use rsibot::{server, Bot, Result, TradingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    tracing::info!("🚀 RSI trading bot starting");

    let config = TradingConfig::from_env()?;

    tracing::info!("📊 Configuration:");
    tracing::info!("  Symbol: {}", config.symbol);
    tracing::info!("  Trade Quantity: {}", config.trade_quantity);
    tracing::info!(
        "  RSI: period {} / overbought {} / oversold {}",
        config.rsi_period,
        config.overbought,
        config.oversold
    );
    tracing::info!("  Feed: {}", config.feed_url);
    tracing::info!(
        "  Orders: {} via {}",
        if config.test_orders { "test" } else { "LIVE" },
        config.rest_endpoint
    );

    let http_port = config.http_port;
    let bot = Arc::new(Bot::new(config));

    // The bot is armed over HTTP (POST /start); it does not trade until told to
    server::run_server(http_port, bot).await?;

    tracing::info!("👋 RSI trading bot stopped");
    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rsibot=info,rsibot::engine=debug".into()),
        )
        .init();
}
