//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! ammo-cli --cart c1-7a0c1f cart show
//! ammo-cli cart add --variant 39897499729985 --quantity 2
//! ammo-cli --cart c1-7a0c1f cart set --key 39897499729985:7a0c1f --quantity 0
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Store origin
//! - `STOREFRONT_CART_TOKEN` - `cart` cookie of the session to act on

use std::sync::Arc;

use ammonader_core::{LineKey, VariantId};
use ammonader_storefront::cart::{
    AddToCart, CartMessages, CartServices, CommitOutcome, QuantityControl, QuantitySynchronizer,
};
use ammonader_storefront::config::StorefrontConfig;
use ammonader_storefront::error::{AppError, Result};
use ammonader_storefront::shopify::{AjaxCartClient, Cart, CartResource};

use super::terminal::TerminalView;

fn client(config: &StorefrontConfig, cart: Option<&str>) -> Result<Arc<AjaxCartClient>> {
    let client = match cart {
        Some(token) => AjaxCartClient::resume(config, token)?,
        None => AjaxCartClient::new(config)?,
    };
    Ok(Arc::new(client))
}

fn services(config: &StorefrontConfig, view: Arc<TerminalView>) -> CartServices {
    CartServices::new(config.money_format.clone(), view, CartMessages::english())
}

/// Log the cart, one event per line.
pub async fn show(config: &StorefrontConfig, cart: Option<&str>) -> Result<Cart> {
    let current = client(config, cart)?.get_cart().await?;
    let money = &config.money_format;

    for item in &current.items {
        tracing::info!(
            key = %item.key,
            quantity = item.quantity,
            line_total = %money.format(item.final_line_price),
            "{}",
            item.title
        );
    }
    tracing::info!(
        item_count = current.item_count,
        total = %money.format(current.total_price),
        "Cart"
    );
    Ok(current)
}

/// Add a variant through the add-to-cart flow.
pub async fn add(
    config: &StorefrontConfig,
    cart: Option<&str>,
    variant: &str,
    quantity: u32,
) -> Result<Cart> {
    let variant: VariantId = variant
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid variant id: {variant}")))?;
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }

    let view = Arc::new(TerminalView::new());
    let flow = AddToCart::new(client(config, cart)?, services(config, view.clone()));
    Ok(flow.submit(variant, quantity, Some(view.as_ref())).await?)
}

/// Commit a typed quantity for one line, exactly as the cart page would.
pub async fn set(
    config: &StorefrontConfig,
    cart: Option<&str>,
    key: &str,
    raw: &str,
    max: Option<u32>,
) -> Result<()> {
    let resource = client(config, cart)?;
    let key = LineKey::from(key);

    let current = resource.get_cart().await?;
    let line = current
        .find_line(&key)
        .ok_or_else(|| AppError::BadRequest(format!("no cart line with key {key}")))?;

    let view = Arc::new(TerminalView::new());
    let sync = QuantitySynchronizer::new(
        QuantityControl::new(key, line.quantity, max),
        resource,
        view.clone(),
        services(config, view),
        config.quantity,
    );

    sync.input(raw);
    sync.cancel_pending();
    match sync.commit().await {
        CommitOutcome::Confirmed { quantity } => {
            tracing::info!(quantity, "Quantity updated");
            Ok(())
        }
        CommitOutcome::Removed { cart_empty } => {
            tracing::info!(cart_empty, "Line removed");
            Ok(())
        }
        CommitOutcome::Reverted { confirmed, error } => {
            tracing::warn!(confirmed, "Quantity reverted");
            Err(error.into())
        }
        CommitOutcome::Skipped => Err(AppError::BadRequest(format!(
            "not a valid quantity: {raw:?}"
        ))),
        CommitOutcome::Busy => Err(AppError::BadRequest(
            "another update is in flight".to_string(),
        )),
    }
}
