use std::sync::Arc;

use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::api::BinanceClient;
use crate::config::TradingConfig;
use crate::engine::{feed, EngineState, OrderGateway, SignalEngine};
use crate::models::BotStatus;

/// Handle to the running feed task
struct FeedHandle {
    shutdown: watch::Sender<bool>,
    _task: JoinHandle<()>,
}

/// Lifecycle wrapper around the signal engine.
///
/// Owns all mutable state and the feed connection; exposes the four-call
/// contract consumed by the HTTP layer: start, stop, status, logs. Safe to
/// share behind an `Arc` between the control surface and the feed task.
pub struct Bot {
    config: Arc<TradingConfig>,
    state: Arc<RwLock<EngineState>>,
    engine: Arc<SignalEngine>,
    feed: Mutex<Option<FeedHandle>>,
}

impl Bot {
    pub fn new(config: TradingConfig) -> Self {
        let config = Arc::new(config);
        let state = Arc::new(RwLock::new(EngineState::new()));

        let client = BinanceClient::new(
            config.rest_endpoint.clone(),
            config.api_key.clone(),
            config.api_secret.clone(),
        );
        let gateway = OrderGateway::new(
            client,
            config.symbol.clone(),
            config.trade_quantity,
            config.test_orders,
        );
        let engine = Arc::new(SignalEngine::new(config.clone(), state.clone(), gateway));

        Self {
            config,
            state,
            engine,
            feed: Mutex::new(None),
        }
    }

    /// Open the feed connection on a background task and mark the bot
    /// running. Returns false (and logs nothing) when already running.
    pub async fn start(&self) -> bool {
        let mut feed = self.feed.lock().await;
        if self.state.read().await.running {
            tracing::info!("Start requested but bot is already running");
            return false;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(feed::run_feed(
            self.config.feed_url.clone(),
            self.engine.clone(),
            shutdown_rx,
        ));
        *feed = Some(FeedHandle {
            shutdown: shutdown_tx,
            _task: task,
        });

        let mut state = self.state.write().await;
        state.running = true;
        state.log("RSI trading bot started");
        true
    }

    /// Request the feed connection to close and mark the bot stopped.
    /// Does not wait for the task to drain; a final in-flight candle may
    /// still be processed. Returns false when already stopped.
    pub async fn stop(&self) -> bool {
        let mut feed = self.feed.lock().await;
        if !self.state.read().await.running {
            tracing::info!("Stop requested but bot is not running");
            return false;
        }

        if let Some(handle) = feed.take() {
            let _ = handle.shutdown.send(true);
        }

        let mut state = self.state.write().await;
        state.running = false;
        state.log("RSI trading bot stopped");
        true
    }

    /// Consistent snapshot of the bot, safe to call concurrently with
    /// candle processing
    pub async fn status(&self) -> BotStatus {
        let state = self.state.read().await;
        BotStatus {
            symbol: self.config.symbol.clone(),
            in_position: state.in_position(),
            total_profit: state.total_profit,
            data_points: state.closes.len(),
            running: state.running,
            current_rsi: state.last_rsi,
            rsi_timestamp: state.last_rsi_at,
        }
    }

    /// Last `limit` log entries, oldest-first; `None` returns the full trail
    pub async fn logs(&self, limit: Option<usize>) -> Vec<String> {
        self.state.read().await.logs_tail(limit)
    }

    pub fn config(&self) -> &TradingConfig {
        &self.config
    }
}
