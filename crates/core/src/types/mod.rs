//! Core types for the aCommerce API.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod environment;
pub mod id;
pub mod inventory;
pub mod timestamp;

pub use environment::{Endpoint, Environment, ParseEnvironmentError};
pub use id::*;
pub use inventory::InventoryAllocation;
pub use timestamp::{SINCE_FORMAT, format_since};
