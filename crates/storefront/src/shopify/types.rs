//! Domain types for the Shopify AJAX cart API.
//!
//! These mirror the JSON returned by `/cart.js`, `/cart/change.js` and
//! `/cart/add.js`. Only the fields the storefront reads are modelled; unknown
//! fields are ignored. Monetary values are integer minor units.

use ammonader_core::{LineKey, ProductId, VariantId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Types
// =============================================================================

/// Full cart representation returned after every cart read or mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart token (session identifier).
    #[serde(default)]
    pub token: Option<String>,
    /// Total number of units across all lines.
    pub item_count: u32,
    /// Line items in display order.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Cart total after discounts, in minor units.
    pub total_price: i64,
    /// Subtotal of the items before cart-level discounts.
    #[serde(default)]
    pub items_subtotal_price: Option<i64>,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: Option<String>,
}

impl Cart {
    /// Find the line with the given key.
    #[must_use]
    pub fn find_line(&self, key: &LineKey) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.key == key)
    }

    /// Returns `true` when the server reports no units in the cart.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Opaque line key, stable across quantity changes.
    pub key: LineKey,
    /// Variant ID (the AJAX API calls this `id`).
    #[serde(default)]
    pub id: Option<VariantId>,
    /// Variant ID.
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    /// Product ID.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Units on this line.
    #[serde(default)]
    pub quantity: u32,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Variant title (absent for single-variant products).
    #[serde(default)]
    pub variant_title: Option<String>,
    /// Unit price after line-level discounts.
    #[serde(default)]
    pub final_price: i64,
    /// Line total after line-level discounts.
    pub final_line_price: i64,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Product URL.
    #[serde(default)]
    pub url: Option<String>,
}

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /cart/change.js`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeLineRequest<'a> {
    /// Line key of the line to change.
    pub id: &'a LineKey,
    /// Desired quantity; `0` removes the line.
    pub quantity: u32,
}

/// Body of `POST /cart/add.js`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AddLineRequest {
    /// Variant to add.
    pub id: VariantId,
    /// Units to add.
    pub quantity: u32,
}

// =============================================================================
// Error Types
// =============================================================================

/// Error payload returned by the cart endpoints on non-2xx responses.
///
/// `status` is sometimes a number and sometimes a string such as
/// `"bad_request"`, so it is not modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartErrorPayload {
    /// Short error title (e.g., "Cart Error").
    #[serde(default)]
    pub message: Option<String>,
    /// Human-readable explanation, safe to show to shoppers.
    #[serde(default)]
    pub description: Option<String>,
}
