//! HTTP control surface mapping the bot's four-call contract onto routes

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::bot::Bot;
use crate::models::BotStatus;

#[derive(Debug, Serialize)]
struct ControlResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct LogsParams {
    limit: Option<usize>,
}

pub fn router(bot: Arc<Bot>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/start", post(start_bot))
        .route("/stop", post(stop_bot))
        .route("/status", get(status))
        .route("/logs", get(logs))
        .with_state(bot)
}

/// Minimal human-readable dashboard
async fn dashboard(State(bot): State<Arc<Bot>>) -> Html<String> {
    let status = bot.status().await;
    let rsi = status
        .current_rsi
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string());

    Html(format!(
        "<html><head><title>RSI Trading Bot</title></head><body>\
         <h1>RSI Trading Bot - {}</h1>\
         <ul>\
         <li>Running: {}</li>\
         <li>In position: {}</li>\
         <li>Total profit: {:.6}</li>\
         <li>Data points: {}</li>\
         <li>Current RSI: {}</li>\
         </ul>\
         </body></html>",
        status.symbol, status.running, status.in_position, status.total_profit,
        status.data_points, rsi
    ))
}

async fn start_bot(State(bot): State<Arc<Bot>>) -> Json<ControlResponse> {
    let started = bot.start().await;
    Json(ControlResponse {
        status: if started {
            "Bot started".to_string()
        } else {
            "Bot is already running".to_string()
        },
    })
}

async fn stop_bot(State(bot): State<Arc<Bot>>) -> Json<ControlResponse> {
    let stopped = bot.stop().await;
    Json(ControlResponse {
        status: if stopped {
            "Bot stopped".to_string()
        } else {
            "Bot is not running".to_string()
        },
    })
}

async fn status(State(bot): State<Arc<Bot>>) -> Json<BotStatus> {
    Json(bot.status().await)
}

async fn logs(
    State(bot): State<Arc<Bot>>,
    Query(params): Query<LogsParams>,
) -> Json<Vec<String>> {
    Json(bot.logs(params.limit).await)
}

/// Serve the control surface until Ctrl-C
pub async fn run_server(port: u16, bot: Arc<Bot>) -> anyhow::Result<()> {
    let app = router(bot);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind control server to {addr}"))?;
    tracing::info!("Control server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("control server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Received Ctrl+C, shutting down...");
}
