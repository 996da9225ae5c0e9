use crate::models::Side;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const ORDER_PATH: &str = "/api/v3/order";
const TEST_ORDER_PATH: &str = "/api/v3/order/test";
const RECV_WINDOW_MS: u32 = 5000;

#[derive(Debug, Error)]
pub enum BinanceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("order rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Acknowledgement returned by the order endpoints. The test endpoint
/// responds with an empty object, so every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Client for the Binance spot REST API (signed endpoints only)
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>, api_key: String, api_secret: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key,
            api_secret,
        }
    }

    /// Place a MARKET order for `quantity` of `symbol`.
    ///
    /// With `test_only` the exchange validates the request without
    /// executing it.
    pub async fn create_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: f64,
        test_only: bool,
    ) -> Result<OrderAck, BinanceError> {
        let timestamp = Utc::now().timestamp_millis();
        let client_order_id = Uuid::new_v4().simple().to_string();
        let query = format!(
            "symbol={}&side={}&type=MARKET&quantity={}&newClientOrderId={}&recvWindow={}&timestamp={}",
            symbol, side, quantity, client_order_id, RECV_WINDOW_MS, timestamp
        );
        let signature = self.sign(&query);

        let path = if test_only { TEST_ORDER_PATH } else { ORDER_PATH };
        let url = format!("{}{}?{}&signature={}", self.base_url, path, query, signature);

        let response = self
            .client
            .post(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BinanceError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<OrderAck>().await?)
    }

    /// HMAC-SHA256 signature over the query string, hex-encoded
    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
