//! Inventory allocation records.

use serde::{Deserialize, Serialize};

/// Stock allocated to a channel for one SKU.
///
/// Only the fields every allocation carries are typed. Anything else the API
/// returns is preserved in `extra` so records survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAllocation {
    /// Merchant SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Quantity allocated to the channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<i64>,
    /// Last time the allocation changed (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
