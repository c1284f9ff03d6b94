//! Debounced cart quantity synchronization.
//!
//! A [`QuantitySynchronizer`] owns one [`QuantityControl`] and keeps the row's
//! displayed quantity consistent with the server: stepper clicks update the
//! input immediately, edits are coalesced behind a debounce timer, and each
//! write either reconciles the page with the returned cart or reverts the
//! input.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ammonader_core::LineKey;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use super::CartServices;
use super::control::{CommitPlan, ControlState, Direction, QuantityControl, StepOutcome};
use super::view::LineView;
use crate::config::QuantitySettings;
use crate::error::add_breadcrumb;
use crate::shopify::{Cart, CartResource, ShopifyError};

/// What a commit did.
#[derive(Debug)]
pub enum CommitOutcome {
    /// Nothing to write: the displayed value is invalid or the row is gone.
    Skipped,
    /// A write for this line is already in flight.
    Busy,
    /// The server accepted `quantity` and the row was refreshed.
    Confirmed { quantity: u32 },
    /// The server accepted quantity 0 and the row was removed.
    Removed { cart_empty: bool },
    /// The write failed; the input shows `confirmed` again.
    Reverted {
        confirmed: u32,
        error: ShopifyError,
    },
}

/// Keeps one cart line's quantity input in sync with the remote cart.
///
/// Cheap to clone; clones drive the same control. Scheduling a commit spawns
/// a Tokio task, so edits must be made from within a runtime.
#[derive(Clone)]
pub struct QuantitySynchronizer {
    inner: Arc<SynchronizerInner>,
}

struct SynchronizerInner {
    shared: Mutex<Shared>,
    cart: Arc<dyn CartResource>,
    line: Arc<dyn LineView>,
    services: CartServices,
    settings: QuantitySettings,
}

struct Shared {
    control: QuantityControl,
    timer: Option<DebounceTimer>,
    generation: u64,
}

/// The single unfired debounce timer of a control.
struct DebounceTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl QuantitySynchronizer {
    /// Create a synchronizer for a freshly rendered row.
    #[must_use]
    pub fn new(
        control: QuantityControl,
        cart: Arc<dyn CartResource>,
        line: Arc<dyn LineView>,
        services: CartServices,
        settings: QuantitySettings,
    ) -> Self {
        Self {
            inner: Arc::new(SynchronizerInner {
                shared: Mutex::new(Shared {
                    control,
                    timer: None,
                    generation: 0,
                }),
                cart,
                line,
                services,
                settings,
            }),
        }
    }

    /// Line key of the controlled row.
    #[must_use]
    pub fn key(&self) -> LineKey {
        self.lock().control.key().clone()
    }

    /// Copy of the control's current state.
    #[must_use]
    pub fn snapshot(&self) -> QuantityControl {
        self.lock().control.clone()
    }

    /// Whether a debounce timer is waiting to fire.
    #[must_use]
    pub fn has_pending_commit(&self) -> bool {
        self.lock().timer.is_some()
    }

    /// Stepper click: update the input now, write after the debounce delay.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime and a commit gets scheduled.
    pub fn step(&self, direction: Direction) -> StepOutcome {
        let outcome = self
            .lock()
            .control
            .step(direction, self.inner.settings.default_max);

        let line = &self.inner.line;
        match outcome {
            StepOutcome::Stepped {
                value,
                message_cleared,
            } => {
                line.render_quantity(&value.to_string());
                if message_cleared {
                    line.clear_message();
                }
                self.schedule_commit();
            }
            StepOutcome::LimitReached { available } => {
                line.show_message(&self.inner.services.messages.only_available(available));
            }
            StepOutcome::Ignored => {}
        }
        outcome
    }

    /// Typed input: record the raw value, write after the debounce delay.
    ///
    /// Returns `false` if the row is locked and the edit was dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn input(&self, raw: &str) -> bool {
        let accepted = self.lock().control.input(raw);
        if accepted {
            self.schedule_commit();
        }
        accepted
    }

    /// Replace any unfired timer with a fresh one.
    ///
    /// When the timer fires it commits whatever the input shows at that
    /// moment, so a burst of edits results in one write.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn schedule_commit(&self) {
        let mut shared = self.lock();
        if let Some(timer) = shared.timer.take() {
            timer.handle.abort();
        }

        shared.generation += 1;
        let generation = shared.generation;
        let delay = self.inner.settings.debounce;
        let this = self.clone();

        // The lock is held until the handle is stored, so the task cannot
        // observe a missing timer for its own generation.
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if this.take_fired_timer(generation) {
                this.commit().await;
            }
        });
        shared.timer = Some(DebounceTimer { generation, handle });
    }

    /// Abort the unfired timer, if any. An in-flight write is not affected.
    pub fn cancel_pending(&self) {
        if let Some(timer) = self.lock().timer.take() {
            timer.handle.abort();
        }
    }

    /// Write the displayed quantity now and reconcile the row with the result.
    #[instrument(skip(self), fields(line = %self.key()))]
    pub async fn commit(&self) -> CommitOutcome {
        let plan = self.lock().control.begin_commit();
        let (quantity, clamped_to) = match plan {
            CommitPlan::Send {
                quantity,
                clamped_to,
            } => (quantity, clamped_to),
            CommitPlan::Invalid(reason) => {
                debug!(%reason, "Ignoring invalid quantity");
                return CommitOutcome::Skipped;
            }
            CommitPlan::Removed => return CommitOutcome::Skipped,
            CommitPlan::Busy => return CommitOutcome::Busy,
        };

        let line = &self.inner.line;
        let messages = &self.inner.services.messages;
        line.clear_message();
        if let Some(available) = clamped_to {
            line.render_quantity(&available.to_string());
            line.show_message(&messages.only_available(available));
        }
        line.set_locked(true);

        let key = self.key();
        let sent = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Quantity change sent",
            Some(&[("line", key.as_str()), ("quantity", sent.as_str())]),
        );
        let outcome = match self.inner.cart.change_line(&key, quantity).await {
            Ok(cart) => self.apply_cart(quantity, &cart),
            Err(error) => {
                error!(error = %error, quantity, "Failed to update cart line");
                let confirmed = self.lock().control.fail();
                line.render_quantity(&confirmed.to_string());
                line.show_message(&messages.update_failed);
                CommitOutcome::Reverted { confirmed, error }
            }
        };

        if line.is_attached() {
            line.set_locked(false);
            if !line.has_focus() {
                line.focus();
            }
        }
        outcome
    }

    /// Patch the row and page from a server-confirmed cart.
    fn apply_cart(&self, quantity: u32, cart: &Cart) -> CommitOutcome {
        let state = self.lock().control.confirm(quantity);
        let key = self.key();
        let services = &self.inner.services;

        let outcome = if state == ControlState::Removed {
            self.inner.line.remove();
            if cart.is_empty() {
                services.surface.show_empty_cart(&services.messages.empty_cart);
            }
            CommitOutcome::Removed {
                cart_empty: cart.is_empty(),
            }
        } else {
            if let Some(item) = cart.find_line(&key) {
                self.inner
                    .line
                    .set_line_total(&services.money.format(item.final_line_price));
            }
            CommitOutcome::Confirmed { quantity }
        };

        services
            .surface
            .set_cart_total(&services.money.format(cart.total_price));
        services.surface.set_item_count(cart.item_count);
        debug!(quantity, item_count = cart.item_count, "Cart line confirmed");
        outcome
    }

    /// Claim the timer for `generation`; `false` means it was superseded.
    fn take_fired_timer(&self, generation: u64) -> bool {
        let mut shared = self.lock();
        match &shared.timer {
            Some(timer) if timer.generation == generation => {
                shared.timer = None;
                true
            }
            _ => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for QuantitySynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.lock();
        f.debug_struct("QuantitySynchronizer")
            .field("control", &shared.control)
            .field("pending_commit", &shared.timer.is_some())
            .finish_non_exhaustive()
    }
}
