//! Inventory allocation methods for the aCommerce API.
//!
//! Inventory is paginated. [`AcommerceClient::inventory_page`] fetches one
//! page; [`AcommerceClient::all_inventory`] walks pages in order until the
//! server stops advertising a next page.

use std::collections::HashSet;

use acommerce_core::{ChannelId, Endpoint, InventoryAllocation, PartnerId};
use reqwest::Method;
use reqwest::header::LINK;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::cache::TokenCache;
use crate::client::{AcommerceClient, decode_json};
use crate::error::AcommerceError;
use crate::link::parse_page_links;

// =============================================================================
// Domain Types
// =============================================================================

/// One page of inventory allocations.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryPage {
    /// Page that was requested (`None` = server default, page 1).
    pub page: Option<u32>,
    /// Allocations on this page, in server order.
    pub items: Vec<InventoryAllocation>,
    /// Next page, if the server advertised one.
    pub next: Option<u32>,
    /// Previous page, if the server advertised one.
    pub prev: Option<u32>,
}

impl InventoryPage {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// A full inventory scan that stopped early.
///
/// Carries every allocation collected before the failure.
#[derive(Debug, Error)]
#[error(
    "inventory scan stopped after {pages_fetched} page(s) with {} item(s): {source}",
    .items.len()
)]
pub struct PartialInventory {
    /// Allocations from the pages fetched successfully.
    pub items: Vec<InventoryAllocation>,
    /// Number of pages fetched successfully.
    pub pages_fetched: u32,
    /// Why the scan stopped.
    #[source]
    pub source: AcommerceError,
}

/// `0` asks for the server default, same as no page at all.
const fn normalize_page(page: Option<u32>) -> Option<u32> {
    match page {
        Some(0) | None => None,
        Some(page) => Some(page),
    }
}

fn allocation_path(channel: &ChannelId, partner: &PartnerId) -> String {
    format!(
        "channel/{}/allocation/merchant/{}",
        urlencoding::encode(channel.as_str()),
        urlencoding::encode(partner.as_str())
    )
}

// =============================================================================
// AcommerceClient Inventory Methods
// =============================================================================

impl<C: TokenCache> AcommerceClient<C> {
    /// Get one page of inventory allocated to `channel` by `partner`.
    ///
    /// `since` limits results to allocations updated after that instant (see
    /// [`acommerce_core::format_since`]). A `page` of `None` or `0` omits the
    /// parameter so the server returns its first page.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError` if the API call fails.
    #[instrument(skip(self), fields(channel = %channel, partner = %partner))]
    pub async fn inventory_page(
        &self,
        channel: &ChannelId,
        partner: &PartnerId,
        since: Option<&str>,
        page: Option<u32>,
    ) -> Result<InventoryPage, AcommerceError> {
        let page = normalize_page(page);

        let mut query = Vec::with_capacity(2);
        if let Some(since) = since {
            query.push(("since", since.to_string()));
        }
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }

        let response = self
            .execute::<()>(
                Method::GET,
                Endpoint::Fulfillment,
                &allocation_path(channel, partner),
                &query,
                None,
            )
            .await?;

        let link_header = response
            .headers()
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");
        let links = parse_page_links(&link_header, page);

        let items: Option<Vec<InventoryAllocation>> = decode_json(response).await?;
        let items = items.unwrap_or_default();

        debug!(
            items = items.len(),
            next = ?links.next,
            prev = ?links.prev,
            "Fetched inventory page"
        );

        Ok(InventoryPage {
            page,
            items,
            next: links.next,
            prev: links.prev,
        })
    }

    /// Get every inventory allocation, following pages from `start_page`.
    ///
    /// Pages are fetched one after another. The scan ends at the first page
    /// that has no items or no next page. It also ends, with an error, when
    /// the server points back at a page already fetched or when the configured
    /// page budget (`max_pages`) is spent.
    ///
    /// # Errors
    ///
    /// Returns `PartialInventory` with the allocations gathered so far if a
    /// page request fails or a pagination guard trips.
    #[instrument(skip(self), fields(channel = %channel, partner = %partner))]
    pub async fn all_inventory(
        &self,
        channel: &ChannelId,
        partner: &PartnerId,
        since: Option<&str>,
        start_page: Option<u32>,
    ) -> Result<Vec<InventoryAllocation>, PartialInventory> {
        let max_pages = self.config().max_pages;
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut pages_fetched = 0_u32;
        let mut page = normalize_page(start_page);

        loop {
            let page_number = page.unwrap_or(1);

            let guard = if pages_fetched >= max_pages {
                Some(AcommerceError::PageLimitExceeded { max_pages })
            } else if !visited.insert(page_number) {
                Some(AcommerceError::PageRevisited { page: page_number })
            } else {
                None
            };
            if let Some(source) = guard {
                warn!(error = %source, "Stopping inventory scan");
                return Err(PartialInventory {
                    items,
                    pages_fetched,
                    source,
                });
            }

            let current = match self.inventory_page(channel, partner, since, page).await {
                Ok(current) => current,
                Err(source) => {
                    return Err(PartialInventory {
                        items,
                        pages_fetched,
                        source,
                    });
                }
            };
            pages_fetched += 1;

            if current.items.is_empty() {
                break;
            }
            items.extend(current.items);

            match current.next {
                Some(next) => page = normalize_page(Some(next)),
                None => break,
            }
        }

        debug!(pages_fetched, items = items.len(), "Inventory scan complete");
        Ok(items)
    }
}
