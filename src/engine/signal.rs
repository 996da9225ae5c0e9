use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::config::TradingConfig;
use crate::engine::{EngineState, OrderGateway};
use crate::indicators::calculate_rsi;
use crate::models::{PositionState, Side};

/// Position & signal state machine.
///
/// Ingests closed-candle prices one at a time, derives the RSI over the
/// accumulated history and drives at most one order per candle. Position
/// gating gives the strategy its hysteresis: a sustained overbought or
/// oversold stretch fires a single order, not one per candle.
pub struct SignalEngine {
    config: Arc<TradingConfig>,
    state: Arc<RwLock<EngineState>>,
    gateway: OrderGateway,
}

impl SignalEngine {
    pub fn new(
        config: Arc<TradingConfig>,
        state: Arc<RwLock<EngineState>>,
        gateway: OrderGateway,
    ) -> Self {
        Self {
            config,
            state,
            gateway,
        }
    }

    /// Append a trail entry from outside the candle path (feed lifecycle
    /// notifications)
    pub async fn log(&self, message: impl Into<String>) {
        self.state.write().await.log(message);
    }

    /// See `log`; warning level
    pub async fn warn(&self, message: impl Into<String>) {
        self.state.write().await.warn(message);
    }

    /// Process one finalized candle.
    ///
    /// Holds the write guard across the order submission: a status read
    /// sees either the full candle effect or none of it. The gateway's
    /// timeout bounds how long the guard can be held.
    pub async fn on_closed_candle(&self, close: f64) {
        if !close.is_finite() {
            self.warn(format!("Rejecting non-finite close price: {close}"))
                .await;
            return;
        }

        let mut state = self.state.write().await;
        state.closes.push(close);
        state.log(format!("Candle closed at {close}"));

        let period = self.config.rsi_period;
        if state.closes.len() <= period {
            let have = state.closes.len();
            state.log(format!(
                "Insufficient data for RSI: {} of {} closes",
                have,
                period + 1
            ));
            return;
        }

        let rsi = match calculate_rsi(&state.closes, period) {
            Some(value) => value,
            None => return,
        };
        state.last_rsi = Some(rsi);
        state.last_rsi_at = Some(Utc::now());
        state.log(format!("RSI({period}) = {rsi:.2}"));

        if rsi > self.config.overbought {
            if state.position == PositionState::Long {
                state.log("RSI overbought - submitting SELL order");
                if self.gateway.submit(Side::Sell).await {
                    state.position = PositionState::Flat;
                    state.total_profit += close * self.config.trade_quantity;
                    let total_profit = state.total_profit;
                    state.log(format!(
                        "SELL filled at {close}, total profit {:.6}",
                        total_profit
                    ));
                } else {
                    state.log("SELL order failed, position unchanged");
                }
            } else {
                state.log("RSI overbought but no position held, nothing to do");
            }
        } else if rsi < self.config.oversold {
            if state.position == PositionState::Flat {
                state.log("RSI oversold - submitting BUY order");
                if self.gateway.submit(Side::Buy).await {
                    state.position = PositionState::Long;
                    state.total_profit -= close * self.config.trade_quantity;
                    let total_profit = state.total_profit;
                    state.log(format!(
                        "BUY filled at {close}, total profit {:.6}",
                        total_profit
                    ));
                } else {
                    state.log("BUY order failed, staying flat");
                }
            } else {
                state.log("RSI oversold but already in position, nothing to do");
            }
        }
        // Neutral zone (threshold equality included): no action
    }
}
