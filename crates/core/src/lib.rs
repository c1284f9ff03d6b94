//! Ammonader Core - Shared types library.
//!
//! This crate provides common types used across all Ammonader storefront components:
//! - `storefront` - Cart synchronization, add-to-cart and variant selection
//! - `cli` - Command-line tools for poking at a live store's cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure formatting - no I/O, no HTTP
//! clients, no async runtime. This keeps it lightweight and allows it to be
//! used anywhere, including WASM front ends.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and line keys, and money formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
