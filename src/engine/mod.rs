// Signal engine and market data plumbing
pub mod feed;
pub mod gateway;
pub mod signal;
pub mod state;

pub use gateway::OrderGateway;
pub use signal::SignalEngine;
pub use state::EngineState;
