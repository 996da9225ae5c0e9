use crate::Result;
use url::Url;

const DEFAULT_SYMBOL: &str = "ETHUSDT";
const DEFAULT_TRADE_QUANTITY: f64 = 0.006;
const DEFAULT_RSI_PERIOD: usize = 14;
const DEFAULT_OVERBOUGHT: f64 = 70.0;
const DEFAULT_OVERSOLD: f64 = 30.0;
const DEFAULT_FEED_URL: &str = "wss://stream.binance.com:9443/ws/ethusdt@kline_1m";
const DEFAULT_REST_ENDPOINT: &str = "https://api.binance.com";
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Immutable bot configuration, loaded once at startup. Never hot-reloaded.
#[derive(Debug, Clone)]
pub struct TradingConfig {
    pub symbol: String,
    pub trade_quantity: f64,
    pub rsi_period: usize,
    pub overbought: f64,
    pub oversold: f64,
    pub feed_url: Url,
    pub rest_endpoint: String,
    pub api_key: String,
    pub api_secret: String,
    /// Route orders to the exchange's validation-only endpoint
    pub test_orders: bool,
    pub http_port: u16,
}

impl TradingConfig {
    /// Load configuration from environment variables (`.env` supported via
    /// dotenvy in main). API credentials are required, everything else
    /// defaults to the ETHUSDT 1m test-order setup.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BINANCE_API_KEY")
            .map_err(|_| "BINANCE_API_KEY not found in environment")?;
        let api_secret = std::env::var("BINANCE_API_SECRET")
            .map_err(|_| "BINANCE_API_SECRET not found in environment")?;

        let feed_url =
            std::env::var("FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string());
        let feed_url = Url::parse(&feed_url).map_err(|e| format!("invalid FEED_URL: {e}"))?;

        Ok(Self {
            symbol: std::env::var("TRADE_SYMBOL").unwrap_or_else(|_| DEFAULT_SYMBOL.to_string()),
            trade_quantity: env_parsed("TRADE_QUANTITY", DEFAULT_TRADE_QUANTITY),
            rsi_period: env_parsed("RSI_PERIOD", DEFAULT_RSI_PERIOD),
            overbought: env_parsed("RSI_OVERBOUGHT", DEFAULT_OVERBOUGHT),
            oversold: env_parsed("RSI_OVERSOLD", DEFAULT_OVERSOLD),
            feed_url,
            rest_endpoint: std::env::var("BINANCE_REST_URL")
                .unwrap_or_else(|_| DEFAULT_REST_ENDPOINT.to_string()),
            api_key,
            api_secret,
            test_orders: env_parsed("USE_TEST_ORDERS", true),
            http_port: env_parsed("HTTP_PORT", DEFAULT_HTTP_PORT),
        })
    }
}

/// Read an env var and parse it, falling back to `default` when the var is
/// missing or unparseable
fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
