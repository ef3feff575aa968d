//! aCommerce API client.
//!
//! Talks to the three aCommerce service roots (identity, fulfillment and
//! shipping) with a subject token obtained from the identity service and
//! cached per account.
//!
//! # Example
//!
//! ```rust,ignore
//! use acommerce_client::{AcommerceClient, AcommerceConfig, ChannelId, PartnerId};
//!
//! let client = AcommerceClient::new(AcommerceConfig::from_env()?)?;
//! let stock = client
//!     .all_inventory(&ChannelId::new("ufc"), &PartnerId::new("1234"), None, None)
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`auth`] - Subject token acquisition
//! - [`cache`] - Token cache backends
//! - [`client`] - Request plumbing shared by every endpoint
//! - [`inventory`] - Paginated inventory allocations
//! - [`orders`], [`shipping`], [`merchants`] - Resource endpoints

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod inventory;
pub mod link;
pub mod merchants;
pub mod orders;
pub mod shipping;

pub use acommerce_core::{
    ChannelId, Endpoint, Environment, InventoryAllocation, OrderId, PartnerId, ShippingOrderId,
    ShippingPartnerId, format_since,
};
pub use auth::TokenManager;
pub use cache::{CacheKey, CachedToken, MemoryTokenCache, MokaTokenCache, TokenCache};
pub use client::{AcommerceClient, SUBJECT_TOKEN_HEADER};
pub use config::{AcommerceConfig, ConfigError, Credentials, DEFAULT_TOKEN_TTL};
pub use error::AcommerceError;
pub use inventory::{InventoryPage, PartialInventory};
pub use link::{PageLinks, parse_page_links};
