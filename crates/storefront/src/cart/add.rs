//! Product-page add-to-cart submission.

use std::sync::Arc;

use ammonader_core::VariantId;
use tracing::{error, info, instrument};

use super::CartServices;
use super::view::{Notice, SubmitButton};
use crate::error::add_breadcrumb;
use crate::shopify::{Cart, CartResource, ShopifyError};

/// Submits the product form to the cart and refreshes the header counter.
#[derive(Clone)]
pub struct AddToCart {
    cart: Arc<dyn CartResource>,
    services: CartServices,
}

impl AddToCart {
    #[must_use]
    pub fn new(cart: Arc<dyn CartResource>, services: CartServices) -> Self {
        Self { cart, services }
    }

    /// Add `quantity` units of `variant` and return the refreshed cart.
    ///
    /// The button, if any, shows the busy label for the duration of the
    /// request and is restored whatever the outcome. Success and failure are
    /// both reported through [`CartSurface::notify`](super::CartSurface::notify).
    ///
    /// # Errors
    ///
    /// Returns the error of the add or the follow-up cart read.
    #[instrument(skip(self, button), fields(variant = %variant))]
    pub async fn submit(
        &self,
        variant: VariantId,
        quantity: u32,
        button: Option<&dyn SubmitButton>,
    ) -> Result<Cart, ShopifyError> {
        let messages = &self.services.messages;
        if let Some(button) = button {
            button.set_busy(&messages.adding);
        }

        let (variant_field, quantity_field) = (variant.to_string(), quantity.to_string());
        add_breadcrumb(
            "cart",
            "Add to cart",
            Some(&[
                ("variant", variant_field.as_str()),
                ("quantity", quantity_field.as_str()),
            ]),
        );
        let result = self.add_and_refresh(variant, quantity).await;

        let surface = &self.services.surface;
        match &result {
            Ok(cart) => {
                info!(item_count = cart.item_count, "Added to cart");
                surface.set_item_count(cart.item_count);
                surface.notify(&Notice::success(messages.added.as_str()));
            }
            Err(e) => {
                error!(error = %e, quantity, "Failed to add to cart");
                let message = e.description().unwrap_or(&messages.add_failed);
                surface.notify(&Notice::error(message));
            }
        }

        if let Some(button) = button {
            button.restore();
        }
        result
    }

    async fn add_and_refresh(&self, variant: VariantId, quantity: u32) -> Result<Cart, ShopifyError> {
        self.cart.add_line(variant, quantity).await?;
        self.cart.get_cart().await
    }
}

impl std::fmt::Debug for AddToCart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddToCart")
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::NoticeKind;
    use crate::cart::test_support::{FakeCart, RecordingButton, RecordingSurface, services};

    fn add_to_cart(cart: &Arc<FakeCart>, surface: &Arc<RecordingSurface>) -> AddToCart {
        AddToCart::new(cart.clone(), services(surface.clone()))
    }

    #[tokio::test]
    async fn test_submit_success() {
        let cart = Arc::new(FakeCart::with_line("1:a", 2, 5_000));
        let surface = Arc::new(RecordingSurface::default());
        let button = RecordingButton::default();

        let refreshed = add_to_cart(&cart, &surface)
            .submit(VariantId::new(77), 3, Some(&button))
            .await
            .unwrap();

        assert_eq!(refreshed.item_count, 5);
        assert_eq!(cart.add_calls(), vec![(VariantId::new(77), 3)]);

        let state = surface.state();
        assert_eq!(state.item_count, Some(5));
        assert_eq!(state.notices.len(), 1);
        assert_eq!(state.notices[0].kind, NoticeKind::Success);
        assert_eq!(state.notices[0].message, "تمت الإضافة للسلة بنجاح!");
        assert_eq!(
            button.history(),
            vec![Some("جاري الإضافة...".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_submit_shows_server_description() {
        let cart = Arc::new(FakeCart::default());
        cart.fail_with_description(422, "All 2 Ammo Box are in your cart.");
        let surface = Arc::new(RecordingSurface::default());
        let button = RecordingButton::default();

        let err = add_to_cart(&cart, &surface)
            .submit(VariantId::new(77), 1, Some(&button))
            .await
            .unwrap_err();

        assert!(matches!(err, ShopifyError::Status { status: 422, .. }));
        let state = surface.state();
        assert!(state.item_count.is_none());
        assert_eq!(state.notices[0].kind, NoticeKind::Error);
        assert_eq!(state.notices[0].message, "All 2 Ammo Box are in your cart.");
        assert_eq!(button.history().last(), Some(&None));
    }

    #[tokio::test]
    async fn test_submit_falls_back_to_generic_error() {
        let cart = Arc::new(FakeCart::default());
        cart.fail_with_status(500);
        let surface = Arc::new(RecordingSurface::default());

        let result = add_to_cart(&cart, &surface)
            .submit(VariantId::new(77), 1, None)
            .await;

        assert!(result.is_err());
        assert_eq!(
            surface.state().notices[0].message,
            "حدث خطأ أثناء الإضافة للسلة"
        );
    }
}
