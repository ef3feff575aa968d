//! `acom inventory`

use acommerce_client::{AcommerceClient, ChannelId, PartnerId};
use serde_json::json;

use super::{CommandError, print_json};

/// Print one page along with its neighbours.
pub async fn page(
    client: &AcommerceClient,
    channel: &ChannelId,
    partner: &PartnerId,
    since: Option<&str>,
    page: Option<u32>,
) -> Result<(), CommandError> {
    let page = client.inventory_page(channel, partner, since, page).await?;
    print_json(&json!({
        "page": page.page.unwrap_or(1),
        "next": page.next,
        "prev": page.prev,
        "items": page.items,
    }))
}

/// Print every allocation from `start_page` on.
///
/// When the scan stops early the items collected so far are still printed
/// and the command fails.
pub async fn all(
    client: &AcommerceClient,
    channel: &ChannelId,
    partner: &PartnerId,
    since: Option<&str>,
    start_page: Option<u32>,
) -> Result<(), CommandError> {
    match client
        .all_inventory(channel, partner, since, start_page)
        .await
    {
        Ok(items) => {
            tracing::info!(items = items.len(), "Inventory scan complete");
            print_json(&items)
        }
        Err(partial) => {
            print_json(&partial.items)?;
            Err(partial.into())
        }
    }
}
