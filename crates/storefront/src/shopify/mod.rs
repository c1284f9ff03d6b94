//! Shopify AJAX cart API client.
//!
//! # Architecture
//!
//! - [`CartResource`] is the seam the cart flows depend on; it is an async
//!   trait so front ends and tests can supply their own transport
//! - [`AjaxCartClient`] implements it with `reqwest` against the storefront's
//!   `/cart*.js` endpoints, carrying the cart session cookie between calls
//! - Shopify is source of truth - nothing is cached locally
//!
//! # Example
//!
//! ```rust,ignore
//! use ammonader_storefront::shopify::{AjaxCartClient, CartResource};
//!
//! let client = AjaxCartClient::new(&config)?;
//!
//! let line = client.add_line(variant_id, 1).await?;
//! let cart = client.change_line(&line.key, 3).await?;
//! ```

mod ajax;
pub mod types;

pub use ajax::AjaxCartClient;
pub use types::*;

use ammonader_core::{LineKey, VariantId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the cart endpoints.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Cart API returned {status}: {}", .description.as_deref().unwrap_or("(no description)"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Shopper-facing description from the error payload, if any.
        description: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl ShopifyError {
    /// Shopper-facing description supplied by the server, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Status { description, .. } => description.as_deref(),
            _ => None,
        }
    }
}

/// The remote cart the storefront mutates.
///
/// Every call returns server-confirmed state; callers never assume a mutation
/// succeeded until the returned future resolves `Ok`.
#[async_trait]
pub trait CartResource: Send + Sync {
    /// Set the quantity of one line. `0` removes the line.
    async fn change_line(&self, key: &LineKey, quantity: u32) -> Result<Cart, ShopifyError>;

    /// Read the current cart.
    async fn get_cart(&self) -> Result<Cart, ShopifyError>;

    /// Add units of a variant, returning the resulting line.
    async fn add_line(&self, variant: VariantId, quantity: u32) -> Result<LineItem, ShopifyError>;
}
