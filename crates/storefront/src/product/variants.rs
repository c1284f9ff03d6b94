//! Variant selection for the product page.
//!
//! The theme embeds the product as JSON: either the full product object (with
//! a `variants` array) or the bare variants array. [`Product::from_json`]
//! accepts both.

use ammonader_core::{MoneyFormat, VariantId};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::cart::CartMessages;

/// Errors reading the embedded product JSON.
#[derive(Debug, Error)]
pub enum VariantError {
    #[error("Invalid product JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Product has no variants")]
    NoVariants,
}

/// Image reference as embedded in variant JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRef {
    pub src: String,
}

/// One purchasable variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    #[serde(default)]
    pub title: String,
    /// Option values in option order (e.g., `["Black", "XL"]`).
    #[serde(default)]
    pub options: Vec<String>,
    /// Price in minor units.
    pub price: i64,
    #[serde(default)]
    pub compare_at_price: Option<i64>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub featured_image: Option<ImageRef>,
    #[serde(default)]
    pub featured_media: Option<ImageRef>,
}

impl Variant {
    /// Featured image (or media preview) source, upgraded to `https:`.
    #[must_use]
    pub fn image_src(&self) -> Option<String> {
        self.featured_image
            .as_ref()
            .or(self.featured_media.as_ref())
            .map(|image| secure_src(&image.src))
    }

    fn has_options(&self, first: &str, second: &str) -> bool {
        self.options.first().map(String::as_str) == Some(first)
            && self.options.get(1).map(String::as_str) == Some(second)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductJson {
    Product { variants: Vec<Variant> },
    Variants(Vec<Variant>),
}

/// A product's variants, in storefront order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    variants: Vec<Variant>,
}

impl Product {
    /// Parse the embedded product JSON.
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Parse` for malformed JSON and
    /// `VariantError::NoVariants` when the product has no variants.
    pub fn from_json(json: &str) -> Result<Self, VariantError> {
        let variants = match serde_json::from_str::<ProductJson>(json)? {
            ProductJson::Product { variants } | ProductJson::Variants(variants) => variants,
        };
        Self::new(variants)
    }

    /// # Errors
    ///
    /// Returns `VariantError::NoVariants` for an empty list.
    pub fn new(variants: Vec<Variant>) -> Result<Self, VariantError> {
        if variants.is_empty() {
            return Err(VariantError::NoVariants);
        }
        Ok(Self { variants })
    }

    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Variant selected on page load: the first available one, else the first.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // never empty
    pub fn initial_variant(&self) -> &Variant {
        self.variants
            .iter()
            .find(|v| v.available)
            .unwrap_or(&self.variants[0])
    }

    /// Variant whose options match `selected` position by position.
    #[must_use]
    pub fn find_variant<S: AsRef<str>>(&self, selected: &[S]) -> Option<&Variant> {
        self.variants.iter().find(|variant| {
            variant.options.len() <= selected.len()
                && variant
                    .options
                    .iter()
                    .zip(selected)
                    .all(|(option, chosen)| option == chosen.as_ref())
        })
    }

    /// Whether an available variant pairs `primary` with `secondary`, in either
    /// option order.
    #[must_use]
    pub fn is_combination_available(&self, primary: &str, secondary: &str) -> bool {
        self.variants.iter().any(|v| {
            v.available && (v.has_options(primary, secondary) || v.has_options(secondary, primary))
        })
    }

    /// Secondary option values that still form an available variant with
    /// `primary`, in first-seen order.
    #[must_use]
    pub fn available_secondary_values(&self, primary: &str) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::new();
        for variant in self.variants.iter().filter(|v| v.available) {
            let other = match variant.options.as_slice() {
                [first, second, ..] if first == primary => second,
                [first, second, ..] if second == primary => first,
                _ => continue,
            };
            if !values.contains(&other.as_str()) {
                values.push(other);
            }
        }
        values
    }

    /// Image of the first variant with `primary` as its first option.
    #[must_use]
    pub fn variant_image(&self, primary: &str) -> Option<String> {
        self.variants
            .iter()
            .filter(|v| v.options.first().map(String::as_str) == Some(primary))
            .find_map(Variant::image_src)
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Add-to-cart button state for a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyButton {
    pub enabled: bool,
    pub label: String,
}

/// Everything the product form shows for the selected variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPresentation {
    /// Value of the hidden `id` input.
    pub variant_id: VariantId,
    pub price: String,
    /// Shown only when the compare-at price exceeds the price.
    pub compare_at: Option<String>,
    pub discount_percent: Option<u32>,
    pub discount_badge: Option<String>,
    pub button: BuyButton,
}

impl VariantPresentation {
    #[must_use]
    pub fn new(variant: &Variant, money: &MoneyFormat, messages: &CartMessages) -> Self {
        let discount = variant
            .compare_at_price
            .filter(|&compare| compare > variant.price)
            .map(|compare| (compare, discount_percent(variant.price, compare)));

        Self {
            variant_id: variant.id,
            price: money.format(variant.price),
            compare_at: discount.map(|(compare, _)| money.format(compare)),
            discount_percent: discount.map(|(_, percent)| percent),
            discount_badge: discount.map(|(_, percent)| messages.discount_badge(percent)),
            button: BuyButton {
                enabled: variant.available,
                label: if variant.available {
                    messages.add_to_cart.clone()
                } else {
                    messages.sold_out.clone()
                },
            },
        }
    }
}

/// Percentage saved, rounded half up. `compare` must exceed `price`; a
/// non-positive `compare` yields no discount.
fn discount_percent(price: i64, compare: i64) -> u32 {
    if compare <= 0 {
        return 0;
    }
    let (price, compare) = (i128::from(price), i128::from(compare));
    let percent = ((compare - price) * 200 + compare) / (2 * compare);
    u32::try_from(percent.clamp(0, 100)).unwrap_or(100)
}

/// `current` with its `variant` query parameter set to `id`.
#[must_use]
pub fn variant_url(current: &Url, id: VariantId) -> Url {
    let pairs: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(key, _)| key != "variant")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = current.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("variant", &id.to_string());
    url
}

fn secure_src(src: &str) -> String {
    src.strip_prefix("http:")
        .map_or_else(|| src.to_string(), |rest| format!("https:{rest}"))
}
