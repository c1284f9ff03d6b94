//! Shopper-facing strings for the cart and product flows.
//!
//! The theme ships in Arabic; [`CartMessages::default`] carries its strings.
//! Templates use `{count}` / `{percent}` as the only substitutions.

/// Localized strings shown by the cart flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartMessages {
    /// Inline message when a line hits its inventory limit. `{count}` is replaced.
    pub only_available: String,
    /// Inline message after a failed quantity update.
    pub update_failed: String,
    /// Replaces the cart container once the last line is removed.
    pub empty_cart: String,
    /// Notification after a successful add-to-cart.
    pub added: String,
    /// Notification after a failed add-to-cart without a server description.
    pub add_failed: String,
    /// Busy label on the add-to-cart button.
    pub adding: String,
    /// Idle label on the add-to-cart button.
    pub add_to_cart: String,
    /// Label on the add-to-cart button for unavailable variants.
    pub sold_out: String,
    /// Discount badge on the product page. `{percent}` is replaced.
    pub discount_badge: String,
}

impl Default for CartMessages {
    fn default() -> Self {
        Self {
            only_available: "متاح فقط {count} قطع.".to_string(),
            update_failed: "حدث خطأ أثناء تحديث السلة. تم استعادة الكمية السابقة.".to_string(),
            empty_cart: "السلة فارغة".to_string(),
            added: "تمت الإضافة للسلة بنجاح!".to_string(),
            add_failed: "حدث خطأ أثناء الإضافة للسلة".to_string(),
            adding: "جاري الإضافة...".to_string(),
            add_to_cart: "أضف للسلة".to_string(),
            sold_out: "غير متوفر".to_string(),
            discount_badge: "خصم {percent}%".to_string(),
        }
    }
}

impl CartMessages {
    /// English strings, for stores running the theme in English.
    #[must_use]
    pub fn english() -> Self {
        Self {
            only_available: "Only {count} available.".to_string(),
            update_failed: "Couldn't update your cart. The previous quantity was restored."
                .to_string(),
            empty_cart: "Your cart is empty".to_string(),
            added: "Added to your cart!".to_string(),
            add_failed: "Couldn't add this item to your cart".to_string(),
            adding: "Adding...".to_string(),
            add_to_cart: "Add to cart".to_string(),
            sold_out: "Sold out".to_string(),
            discount_badge: "{percent}% off".to_string(),
        }
    }

    /// Render the inventory-limit message for `count` units.
    #[must_use]
    pub fn only_available(&self, count: u32) -> String {
        self.only_available.replace("{count}", &count.to_string())
    }

    /// Render the discount badge for `percent`.
    #[must_use]
    pub fn discount_badge(&self, percent: u32) -> String {
        self.discount_badge.replace("{percent}", &percent.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_available_arabic() {
        assert_eq!(CartMessages::default().only_available(5), "متاح فقط 5 قطع.");
    }

    #[test]
    fn test_only_available_english() {
        assert_eq!(
            CartMessages::english().only_available(5),
            "Only 5 available."
        );
    }

    #[test]
    fn test_discount_badge() {
        assert_eq!(CartMessages::default().discount_badge(25), "خصم 25%");
        assert_eq!(CartMessages::english().discount_badge(25), "25% off");
    }
}
