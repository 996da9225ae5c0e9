use crate::models::PositionState;
use chrono::{DateTime, Utc};

/// All mutable bot state, owned by the controller behind a single lock.
///
/// The feed task is the only writer; status/log readers take snapshots.
#[derive(Debug)]
pub struct EngineState {
    /// Close prices of accepted closed candles, in arrival order.
    /// Append-only for the life of the process.
    pub closes: Vec<f64>,
    pub position: PositionState,
    pub total_profit: f64,
    pub last_rsi: Option<f64>,
    pub last_rsi_at: Option<DateTime<Utc>>,
    pub running: bool,
    logs: Vec<String>,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            closes: Vec::new(),
            position: PositionState::Flat,
            total_profit: 0.0,
            last_rsi: None,
            last_rsi_at: None,
            running: false,
            logs: Vec::new(),
        }
    }

    pub fn in_position(&self) -> bool {
        self.position == PositionState::Long
    }

    /// Append a timestamped entry to the log trail and mirror it to tracing
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.push_entry(message);
    }

    /// Same as `log` but at warning level
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.push_entry(message);
    }

    fn push_entry(&mut self, message: String) {
        let stamped = format!("[{}] {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"), message);
        self.logs.push(stamped);
    }

    /// Last `limit` log entries, oldest-first. `None` or an oversized
    /// limit returns the full trail.
    pub fn logs_tail(&self, limit: Option<usize>) -> Vec<String> {
        let n = limit.unwrap_or(self.logs.len()).min(self.logs.len());
        self.logs[self.logs.len() - n..].to_vec()
    }

    pub fn log_count(&self) -> usize {
        self.logs.len()
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_flat_and_empty() {
        let state = EngineState::new();
        assert_eq!(state.position, PositionState::Flat);
        assert!(!state.in_position());
        assert!(!state.running);
        assert_eq!(state.total_profit, 0.0);
        assert!(state.closes.is_empty());
        assert!(state.logs_tail(None).is_empty());
    }

    #[test]
    fn test_logs_tail_returns_suffix_in_order() {
        let mut state = EngineState::new();
        for i in 0..5 {
            state.log(format!("entry {i}"));
        }

        let tail = state.logs_tail(Some(2));
        assert_eq!(tail.len(), 2);
        assert!(tail[0].ends_with("entry 3"));
        assert!(tail[1].ends_with("entry 4"));
    }

    #[test]
    fn test_logs_tail_oversized_limit_returns_all() {
        let mut state = EngineState::new();
        state.log("only entry");

        assert_eq!(state.logs_tail(Some(100)).len(), 1);
        assert_eq!(state.logs_tail(None).len(), 1);
    }

    #[test]
    fn test_log_entries_are_timestamped() {
        let mut state = EngineState::new();
        state.warn("something odd");

        let tail = state.logs_tail(None);
        assert!(tail[0].starts_with('['));
        assert!(tail[0].contains("UTC] something odd"));
    }
}
