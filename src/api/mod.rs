pub mod binance;

pub use binance::{BinanceClient, BinanceError, OrderAck};
