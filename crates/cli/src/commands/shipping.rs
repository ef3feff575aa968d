//! `acom shipping`

use acommerce_client::{AcommerceClient, ShippingOrderId, ShippingPartnerId};

use super::{CommandError, print_json, read_body};

pub async fn get(
    client: &AcommerceClient,
    partner: &ShippingPartnerId,
    order: &ShippingOrderId,
) -> Result<(), CommandError> {
    print_json(&client.shipping_order(partner, order).await?)
}

pub async fn put(
    client: &AcommerceClient,
    partner: &ShippingPartnerId,
    order: &ShippingOrderId,
    file: &str,
) -> Result<(), CommandError> {
    let body = read_body(file)?;
    let response = client.create_shipping_order(partner, order, &body).await?;
    tracing::info!(partner = %partner, shipping_order_id = %order, "Shipping order submitted");
    print_json(&response)
}
