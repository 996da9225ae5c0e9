use std::sync::Arc;

use rsibot::api::BinanceClient;
use rsibot::engine::{feed, EngineState, OrderGateway, SignalEngine};
use rsibot::indicators::calculate_rsi;
use rsibot::models::PositionState;
use rsibot::{Bot, TradingConfig};
use tokio::sync::RwLock;
use url::Url;

fn config_with(rest_endpoint: &str, rsi_period: usize) -> TradingConfig {
    TradingConfig {
        symbol: "ETHUSDT".to_string(),
        trade_quantity: 0.006,
        rsi_period,
        overbought: 70.0,
        oversold: 30.0,
        feed_url: Url::parse("ws://127.0.0.1:1/ws").unwrap(),
        rest_endpoint: rest_endpoint.to_string(),
        api_key: "test_key".to_string(),
        api_secret: "test_secret".to_string(),
        test_orders: true,
        http_port: 0,
    }
}

fn build_engine(config: TradingConfig) -> (Arc<SignalEngine>, Arc<RwLock<EngineState>>) {
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
    let engine = Arc::new(SignalEngine::new(config, state.clone(), gateway));
    (engine, state)
}

fn kline(closed: bool, close: &str) -> String {
    format!(
        r#"{{"e":"kline","E":1672515782136,"s":"ETHUSDT","k":{{"t":1672515780000,"s":"ETHUSDT","i":"1m","x":{closed},"c":"{close}","o":"10.0","h":"12.0","l":"9.0","v":"54.2"}}}}"#
    )
}

#[tokio::test]
async fn test_e2e_workflow() {
    let _ = tracing_subscriber::fmt::try_init();

    println!("=== Starting E2E Test ===\n");

    // 1. Indicator on its own
    println!("1. Testing RSI indicator...");
    let prices = vec![10.0, 9.0, 8.0, 7.0];
    let rsi = calculate_rsi(&prices, 3);
    assert_eq!(rsi, Some(0.0));
    println!("   ✓ RSI(3) over a falling series: {:.2}", rsi.unwrap());

    // 2. Full candle -> signal -> order round trip against a stubbed venue
    println!("\n2. Testing signal engine round trip...");
    let mut venue = mockito::Server::new_async().await;
    let order_mock = venue
        .mock("POST", "/api/v3/order/test")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;

    let (engine, state) = build_engine(config_with(&venue.url(), 3));

    // Mid-candle updates must not append; malformed messages must not kill
    // the listener
    feed::handle_message(&engine, &kline(false, "10.0")).await;
    feed::handle_message(&engine, "{broken").await;

    for close in ["10.0", "9.0", "8.0", "7.0"] {
        feed::handle_message(&engine, &kline(true, close)).await;
    }

    {
        let state = state.read().await;
        assert_eq!(state.closes.len(), 4);
        assert_eq!(state.position, PositionState::Long);
        assert!((state.total_profit - (-7.0 * 0.006)).abs() < 1e-9);
        println!("   ✓ Oversold entry: LONG, profit {:.6}", state.total_profit);
    }

    // Spike pushes the RSI overbought; the position unwinds
    feed::handle_message(&engine, &kline(true, "20.0")).await;
    {
        let state = state.read().await;
        assert_eq!(state.position, PositionState::Flat);
        let expected = (-7.0 + 20.0) * 0.006;
        assert!((state.total_profit - expected).abs() < 1e-9);
        println!("   ✓ Overbought exit: FLAT, profit {:.6}", state.total_profit);
    }

    order_mock.assert_async().await;

    // 3. Controller lifecycle and log trail
    println!("\n3. Testing controller lifecycle...");
    let bot = Bot::new(config_with("http://127.0.0.1:1", 14));

    assert!(bot.start().await);
    assert!(!bot.start().await, "second start must be a no-op");
    assert!(bot.status().await.running);

    assert!(bot.stop().await);
    assert!(!bot.stop().await, "second stop must be a no-op");
    assert!(!bot.status().await.running);

    let logs = bot.logs(None).await;
    assert_eq!(
        logs.iter().filter(|l| l.contains("bot started")).count(),
        1
    );
    assert_eq!(
        logs.iter().filter(|l| l.contains("bot stopped")).count(),
        1
    );
    println!("   ✓ Idempotent start/stop, {} trail entries", logs.len());

    println!("\n=== E2E Test Complete ===");
}
