//! QuickCart Core - Shared types library.
//!
//! This crate provides common types used across all QuickCart components:
//! - `storefront` - Catalog, cart, checkout and the JSON storefront server
//! - `cli` - Command-line tools operating on the persisted snapshots
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, delivery times and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
