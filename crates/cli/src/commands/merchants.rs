//! `acom merchants`

use acommerce_client::{AcommerceClient, ChannelId};

use super::{CommandError, print_json};

pub async fn list(client: &AcommerceClient, channel: &ChannelId) -> Result<(), CommandError> {
    print_json(&client.merchants(channel).await?)
}
