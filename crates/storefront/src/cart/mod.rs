//! Cart page behaviour: quantity controls and add-to-cart.
//!
//! Everything here is driven through the [`CartResource`] trait and the view
//! traits in [`view`], so the flows run the same against the live AJAX API,
//! a test double or a terminal.
//!
//! [`CartResource`]: crate::shopify::CartResource

mod add;
pub mod control;
mod messages;
mod sync;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use ammonader_core::MoneyFormat;

pub use add::AddToCart;
pub use control::{
    CommitPlan, ControlState, Direction, LineMessage, QuantityControl, QuantityInputError,
    StepOutcome, parse_quantity,
};
pub use messages::CartMessages;
pub use sync::{CommitOutcome, QuantitySynchronizer};
pub use view::{CartSurface, LineView, Notice, NoticeKind, SubmitButton};

/// Page-wide collaborators shared by every cart flow on a page.
#[derive(Clone)]
pub struct CartServices {
    /// Formats minor units for display.
    pub money: MoneyFormat,
    /// Totals, counters and notifications.
    pub surface: Arc<dyn CartSurface>,
    /// Shopper-facing strings.
    pub messages: CartMessages,
}

impl CartServices {
    #[must_use]
    pub fn new(money: MoneyFormat, surface: Arc<dyn CartSurface>, messages: CartMessages) -> Self {
        Self {
            money,
            surface,
            messages,
        }
    }
}

impl std::fmt::Debug for CartServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartServices")
            .field("money", &self.money)
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}
