//! Shopify AJAX cart API client implementation.
//!
//! Uses `reqwest` with a cookie store so the `cart` session cookie set by the
//! first response is replayed on later calls.

use std::sync::Arc;

use ammonader_core::{LineKey, VariantId};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use reqwest::cookie::Jar;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::types::{AddLineRequest, Cart, CartErrorPayload, ChangeLineRequest, LineItem};
use super::{CartResource, ShopifyError};
use crate::config::StorefrontConfig;

// =============================================================================
// AjaxCartClient
// =============================================================================

/// Client for the storefront's AJAX cart endpoints.
///
/// Cheap to clone; clones share the connection pool and cookie jar.
#[derive(Clone)]
pub struct AjaxCartClient {
    inner: Arc<AjaxCartClientInner>,
}

struct AjaxCartClientInner {
    client: reqwest::Client,
    cart_url: Url,
    change_url: Url,
    add_url: Url,
}

impl std::fmt::Debug for AjaxCartClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AjaxCartClient")
            .field("cart_url", &self.inner.cart_url.as_str())
            .finish_non_exhaustive()
    }
}

impl AjaxCartClient {
    /// Create a client for the store configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the endpoint
    /// URLs cannot be derived from the base URL.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ShopifyError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(&config.base_url, builder.build()?)
    }

    /// Create a client that continues an existing cart session.
    ///
    /// `token` is the value of the store's `cart` cookie.
    ///
    /// # Errors
    ///
    /// Same as [`AjaxCartClient::new`].
    pub fn resume(config: &StorefrontConfig, token: &str) -> Result<Self, ShopifyError> {
        let jar = Jar::default();
        jar.add_cookie_str(&format!("cart={token}; Path=/"), &config.base_url);

        let mut builder = reqwest::Client::builder().cookie_provider(Arc::new(jar));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(&config.base_url, builder.build()?)
    }

    /// Create a client from an existing `reqwest::Client`.
    ///
    /// The client should have a cookie store enabled, otherwise every call
    /// lands on a fresh cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URLs cannot be derived from `base_url`.
    pub fn with_client(base_url: &Url, client: reqwest::Client) -> Result<Self, ShopifyError> {
        let base = with_trailing_slash(base_url);

        Ok(Self {
            inner: Arc::new(AjaxCartClientInner {
                client,
                cart_url: base.join("cart.js")?,
                change_url: base.join("cart/change.js")?,
                add_url: base.join("cart/add.js")?,
            }),
        })
    }

    /// Send a request and decode a JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ShopifyError> {
        let response = request.header("Accept", "application/json").send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Cart API returned non-success status"
            );
            let payload: CartErrorPayload =
                serde_json::from_str(&response_text).unwrap_or_default();
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                description: payload.description.or(payload.message),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse cart API response"
            );
            ShopifyError::Parse(e)
        })
    }
}

#[async_trait]
impl CartResource for AjaxCartClient {
    #[instrument(skip(self), fields(line = %key))]
    async fn change_line(&self, key: &LineKey, quantity: u32) -> Result<Cart, ShopifyError> {
        let body = ChangeLineRequest { id: key, quantity };
        let request = self
            .inner
            .client
            .post(self.inner.change_url.clone())
            .json(&body);

        let cart: Cart = self.execute(request).await?;
        debug!(item_count = cart.item_count, "Cart line changed");
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn get_cart(&self) -> Result<Cart, ShopifyError> {
        let request = self.inner.client.get(self.inner.cart_url.clone());
        self.execute(request).await
    }

    #[instrument(skip(self), fields(variant = %variant))]
    async fn add_line(&self, variant: VariantId, quantity: u32) -> Result<LineItem, ShopifyError> {
        let body = AddLineRequest {
            id: variant,
            quantity,
        };
        let request = self.inner.client.post(self.inner.add_url.clone()).json(&body);

        let line: LineItem = self.execute(request).await?;
        debug!(line = %line.key, quantity = line.quantity, "Line added to cart");
        Ok(line)
    }
}

/// Ensure relative joins keep the base path (e.g. a `/ar/` locale prefix).
fn with_trailing_slash(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
