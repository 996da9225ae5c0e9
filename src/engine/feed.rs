use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use crate::engine::SignalEngine;

/// Kline stream payload. Only the candle object is of interest; symbol and
/// interval are fixed by the subscription URL and not re-validated here.
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "k")]
    kline: Kline,
}

#[derive(Debug, Deserialize)]
struct Kline {
    /// Candle-closed flag; mid-candle updates carry false
    #[serde(rename = "x")]
    closed: bool,
    /// Close price, quoted as a string by the exchange
    #[serde(rename = "c")]
    close: String,
}

/// Run the market feed until the transport closes or shutdown is signalled.
///
/// Messages are handled to completion one at a time, so candle processing
/// never overlaps. The connection is not re-established on drop; restarting
/// is the controller's (or an operator's) explicit stop/start decision.
pub async fn run_feed(url: Url, engine: Arc<SignalEngine>, mut shutdown: watch::Receiver<bool>) {
    let (ws_stream, _) = match connect_async(url.as_str()).await {
        Ok(conn) => conn,
        Err(e) => {
            engine
                .warn(format!("WebSocket connection to {url} failed: {e}"))
                .await;
            return;
        }
    };
    engine.log("WebSocket connection opened").await;

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                // Best-effort close; the server finishes the handshake on
                // its own time
                let _ = write.send(Message::Close(None)).await;
                break;
            }
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => handle_message(&engine, &text).await,
                Some(Ok(Message::Ping(payload))) => {
                    let _ = write.send(Message::Pong(payload)).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!("WebSocket error: {e}");
                    break;
                }
            }
        }
    }

    engine.log("WebSocket connection closed").await;
}

/// Decode one stream message and forward a finalized close price to the
/// signal engine. Malformed messages are dropped with a warning; they never
/// reach the price history.
pub async fn handle_message(engine: &SignalEngine, text: &str) {
    let event: StreamEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            engine
                .warn(format!("Dropping malformed feed message: {e}"))
                .await;
            return;
        }
    };

    if !event.kline.closed {
        return;
    }

    match event.kline.close.parse::<f64>() {
        Ok(close) => engine.on_closed_candle(close).await,
        Err(_) => {
            engine
                .warn(format!(
                    "Dropping candle with non-numeric close: {:?}",
                    event.kline.close
                ))
                .await;
        }
    }
}
