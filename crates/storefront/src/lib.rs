//! Ammonader storefront library.
//!
//! Cart quantity synchronization, add-to-cart and variant selection for the
//! Ammonader Shopify theme, written against trait seams so the same flows run
//! in the browser bridge, the CLI and the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod product;
pub mod shopify;
