use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order side sent to the exchange
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Exchange wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the bot currently holds a long position in the traded asset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

/// Snapshot of the bot returned by `Bot::status` and `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotStatus {
    pub symbol: String,
    pub in_position: bool,
    pub total_profit: f64,
    pub data_points: usize,
    pub running: bool,
    pub current_rsi: Option<f64>,
    pub rsi_timestamp: Option<DateTime<Utc>>,
}
