//! aCommerce Core - Shared types library.
//!
//! This crate provides common types used across the aCommerce components:
//! - `client` - Authenticated HTTP client for the aCommerce API
//! - `cli` - Command-line tool for operators
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, environments and endpoints, inventory records,
//!   and timestamp formatting for the API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
