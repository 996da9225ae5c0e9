use crate::api::BinanceClient;
use crate::models::Side;
use tokio::time::{timeout, Duration};

const ORDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around the exchange client. Faults never cross this
/// boundary: any rejection, transport error or timeout becomes `false`.
pub struct OrderGateway {
    client: BinanceClient,
    symbol: String,
    quantity: f64,
    test_orders: bool,
}

impl OrderGateway {
    pub fn new(client: BinanceClient, symbol: String, quantity: f64, test_orders: bool) -> Self {
        Self {
            client,
            symbol,
            quantity,
            test_orders,
        }
    }

    /// Submit a MARKET order for the configured symbol and quantity.
    /// Returns true only on a confirmed acknowledgement from the venue.
    pub async fn submit(&self, side: Side) -> bool {
        tracing::info!(
            "Sending {} order for {} {}",
            side,
            self.quantity,
            self.symbol
        );

        let order = self
            .client
            .create_order(&self.symbol, side, self.quantity, self.test_orders);

        match timeout(ORDER_TIMEOUT, order).await {
            Ok(Ok(ack)) => {
                tracing::info!(?ack, "Order accepted");
                true
            }
            Ok(Err(e)) => {
                tracing::error!("Order submission failed: {e}");
                false
            }
            Err(_) => {
                tracing::error!("Order submission timed out after {ORDER_TIMEOUT:?}");
                false
            }
        }
    }
}
