//! `acom order`

use acommerce_client::{AcommerceClient, ChannelId, OrderId};

use super::{CommandError, print_json, read_body};

pub async fn get(
    client: &AcommerceClient,
    channel: &ChannelId,
    order: &OrderId,
) -> Result<(), CommandError> {
    print_json(&client.sales_order(channel, order).await?)
}

pub async fn put(
    client: &AcommerceClient,
    channel: &ChannelId,
    order: &OrderId,
    file: &str,
) -> Result<(), CommandError> {
    let body = read_body(file)?;
    let response = client.create_sales_order(channel, order, &body).await?;
    tracing::info!(channel = %channel, order_id = %order, "Sales order submitted");
    print_json(&response)
}
