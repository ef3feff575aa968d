//! Merchant listing for a sales channel.

use acommerce_core::{ChannelId, Endpoint};
use tracing::instrument;

use crate::cache::TokenCache;
use crate::client::AcommerceClient;
use crate::error::AcommerceError;

impl<C: TokenCache> AcommerceClient<C> {
    /// List the merchants selling on `channel`.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError` if the API call fails.
    #[instrument(skip(self), fields(channel = %channel))]
    pub async fn merchants(
        &self,
        channel: &ChannelId,
    ) -> Result<serde_json::Value, AcommerceError> {
        let path = format!("channel/{}/merchants", urlencoding::encode(channel.as_str()));
        self.get(Endpoint::Fulfillment, &path).await
    }
}
