//! Sales order methods for the aCommerce fulfillment API.
//!
//! Order payloads are passed through as JSON. Callers can send their own
//! `Serialize` types and convert responses with `serde_json::from_value`.

use acommerce_core::{ChannelId, Endpoint, OrderId};
use serde::Serialize;
use tracing::instrument;

use crate::cache::TokenCache;
use crate::client::AcommerceClient;
use crate::error::AcommerceError;

fn sales_order_path(channel: &ChannelId, order: &OrderId) -> String {
    format!(
        "channel/{}/order/{}",
        urlencoding::encode(channel.as_str()),
        urlencoding::encode(order.as_str())
    )
}

impl<C: TokenCache> AcommerceClient<C> {
    /// Get a sales order's detail.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError::NotFound` if the order does not exist, or
    /// another `AcommerceError` if the API call fails.
    #[instrument(skip(self), fields(channel = %channel, order_id = %order))]
    pub async fn sales_order(
        &self,
        channel: &ChannelId,
        order: &OrderId,
    ) -> Result<serde_json::Value, AcommerceError> {
        self.get(Endpoint::Fulfillment, &sales_order_path(channel, order)).await
    }

    /// Create (or replace) a sales order.
    ///
    /// The order ID is chosen by the channel, so creation is an idempotent
    /// `PUT`.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError` if the API rejects the order or the call fails.
    #[instrument(skip(self, order_body), fields(channel = %channel, order_id = %order))]
    pub async fn create_sales_order<B>(
        &self,
        channel: &ChannelId,
        order: &OrderId,
        order_body: &B,
    ) -> Result<serde_json::Value, AcommerceError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.put(Endpoint::Fulfillment, &sales_order_path(channel, order), order_body).await
    }
}
