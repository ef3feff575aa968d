//! Shipping order methods for the aCommerce shipping API.

use acommerce_core::{Endpoint, ShippingOrderId, ShippingPartnerId};
use serde::Serialize;
use tracing::instrument;

use crate::cache::TokenCache;
use crate::client::AcommerceClient;
use crate::error::AcommerceError;

fn shipping_order_path(partner: &ShippingPartnerId, order: &ShippingOrderId) -> String {
    format!(
        "partner/{}/order/{}",
        urlencoding::encode(partner.as_str()),
        urlencoding::encode(order.as_str())
    )
}

impl<C: TokenCache> AcommerceClient<C> {
    /// Get a shipping order.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError` if the API call fails.
    #[instrument(skip(self), fields(partner = %partner, shipping_order_id = %order))]
    pub async fn shipping_order(
        &self,
        partner: &ShippingPartnerId,
        order: &ShippingOrderId,
    ) -> Result<serde_json::Value, AcommerceError> {
        self.get(Endpoint::Shipping, &shipping_order_path(partner, order)).await
    }

    /// Create (or replace) a shipping order.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError` if the API rejects the order or the call fails.
    #[instrument(skip(self, order_body), fields(partner = %partner, shipping_order_id = %order))]
    pub async fn create_shipping_order<B>(
        &self,
        partner: &ShippingPartnerId,
        order: &ShippingOrderId,
        order_body: &B,
    ) -> Result<serde_json::Value, AcommerceError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.put(Endpoint::Shipping, &shipping_order_path(partner, order), order_body).await
    }
}
