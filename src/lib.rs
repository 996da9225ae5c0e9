// Core modules
pub mod api;
pub mod bot;
pub mod config;
pub mod engine;
pub mod indicators;
pub mod models;
pub mod server;

// Re-export commonly used types
pub use bot::Bot;
pub use config::TradingConfig;
pub use models::{BotStatus, PositionState, Side};

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
