//! In-memory cart and recording views for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex, MutexGuard};

use ammonader_core::{LineKey, MoneyFormat, VariantId};
use async_trait::async_trait;
use tokio::sync::Notify;

use super::view::{CartSurface, LineView, Notice, SubmitButton};
use super::{CartMessages, CartServices};
use crate::shopify::{Cart, CartResource, LineItem, ShopifyError};

/// Services with the default money format and Arabic strings.
pub fn services(surface: Arc<RecordingSurface>) -> CartServices {
    CartServices::new(MoneyFormat::default(), surface, CartMessages::default())
}

// =============================================================================
// Fake Cart
// =============================================================================

#[derive(Debug, Clone)]
struct FakeLine {
    key: LineKey,
    variant: VariantId,
    quantity: u32,
    unit_price: i64,
}

impl FakeLine {
    fn to_item(&self) -> LineItem {
        LineItem {
            key: self.key.clone(),
            id: Some(self.variant),
            variant_id: Some(self.variant),
            product_id: None,
            quantity: self.quantity,
            title: "Ammo Box".to_string(),
            variant_title: None,
            final_price: self.unit_price,
            final_line_price: self.unit_price * i64::from(self.quantity),
            image: None,
            url: None,
        }
    }
}

#[derive(Default)]
struct FakeState {
    lines: Vec<FakeLine>,
    changes: Vec<(LineKey, u32)>,
    adds: Vec<(VariantId, u32)>,
    failure: Option<(u16, Option<String>)>,
    omit_lines: bool,
    gate: Option<Arc<Gate>>,
}

/// A cart that lives in memory and records every write.
#[derive(Default)]
pub struct FakeCart {
    state: Mutex<FakeState>,
}

impl FakeCart {
    /// A cart holding one line.
    pub fn with_line(key: &str, quantity: u32, unit_price: i64) -> Self {
        let cart = Self::default();
        cart.add_other_line(key, quantity, unit_price);
        cart
    }

    /// Add another line to the cart.
    pub fn add_other_line(&self, key: &str, quantity: u32, unit_price: i64) {
        let mut state = self.lock();
        let variant = VariantId::new(i64::try_from(state.lines.len()).unwrap() + 1);
        state.lines.push(FakeLine {
            key: LineKey::from(key),
            variant,
            quantity,
            unit_price,
        });
    }

    /// Fail every following request with `status`.
    pub fn fail_with_status(&self, status: u16) {
        self.lock().failure = Some((status, None));
    }

    /// Fail every following request with `status` and a shopper-facing description.
    pub fn fail_with_description(&self, status: u16, description: &str) {
        self.lock().failure = Some((status, Some(description.to_string())));
    }

    /// Leave the line items out of returned carts.
    pub fn forget_line_in_responses(&self) {
        self.lock().omit_lines = true;
    }

    /// Hold the next `change_line` until the returned gate is released.
    pub fn hold_next_change(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.lock().gate = Some(gate.clone());
        gate
    }

    /// Every `change_line` call so far.
    pub fn change_calls(&self) -> Vec<(LineKey, u32)> {
        self.lock().changes.clone()
    }

    /// Every `add_line` call so far.
    pub fn add_calls(&self) -> Vec<(VariantId, u32)> {
        self.lock().adds.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn failure(state: &FakeState) -> Option<ShopifyError> {
        state
            .failure
            .clone()
            .map(|(status, description)| ShopifyError::Status {
                status,
                description,
            })
    }

    fn snapshot(state: &FakeState) -> Cart {
        Cart {
            token: Some("fake".to_string()),
            item_count: state.lines.iter().map(|l| l.quantity).sum(),
            items: if state.omit_lines {
                Vec::new()
            } else {
                state.lines.iter().map(FakeLine::to_item).collect()
            },
            total_price: state
                .lines
                .iter()
                .map(|l| l.unit_price * i64::from(l.quantity))
                .sum(),
            items_subtotal_price: None,
            currency: Some("EGP".to_string()),
        }
    }
}

#[async_trait]
impl CartResource for FakeCart {
    async fn change_line(&self, key: &LineKey, quantity: u32) -> Result<Cart, ShopifyError> {
        let gate = {
            let mut state = self.lock();
            state.changes.push((key.clone(), quantity));
            state.gate.take()
        };
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        let mut state = self.lock();
        if let Some(error) = Self::failure(&state) {
            return Err(error);
        }
        if let Some(line) = state.lines.iter_mut().find(|l| &l.key == key) {
            line.quantity = quantity;
        }
        state.lines.retain(|l| l.quantity > 0);
        Ok(Self::snapshot(&state))
    }

    async fn get_cart(&self) -> Result<Cart, ShopifyError> {
        let state = self.lock();
        Self::failure(&state).map_or_else(|| Ok(Self::snapshot(&state)), Err)
    }

    async fn add_line(&self, variant: VariantId, quantity: u32) -> Result<LineItem, ShopifyError> {
        let mut state = self.lock();
        state.adds.push((variant, quantity));
        if let Some(error) = Self::failure(&state) {
            return Err(error);
        }

        if let Some(line) = state.lines.iter_mut().find(|l| l.variant == variant) {
            line.quantity += quantity;
            return Ok(line.to_item());
        }
        let line = FakeLine {
            key: LineKey::new(format!("{variant}:added")),
            variant,
            quantity,
            unit_price: 10_000,
        };
        let item = line.to_item();
        state.lines.push(line);
        Ok(item)
    }
}

/// Pauses a fake request until released.
#[derive(Default)]
pub struct Gate {
    started: Notify,
    release: Notify,
}

impl Gate {
    /// Wait until the held request has started.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let the held request finish.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

// =============================================================================
// Recording Views
// =============================================================================

/// Everything a [`RecordingLine`] has been told.
#[derive(Debug, Clone, Default)]
pub struct LineState {
    pub displayed: String,
    pub message: Option<String>,
    pub locked: bool,
    pub lock_history: Vec<bool>,
    pub line_total: Option<String>,
    pub attached: bool,
    pub focused: bool,
    pub focus_calls: usize,
}

/// A cart row that records what it was told to show.
#[derive(Default)]
pub struct RecordingLine {
    state: Mutex<LineState>,
}

impl RecordingLine {
    /// An attached, unfocused row showing `quantity`.
    pub fn attached(quantity: u32) -> Self {
        Self {
            state: Mutex::new(LineState {
                displayed: quantity.to_string(),
                attached: true,
                ..LineState::default()
            }),
        }
    }

    pub fn set_focused(&self, focused: bool) {
        self.state.lock().unwrap().focused = focused;
    }

    pub fn state(&self) -> LineState {
        self.state.lock().unwrap().clone()
    }
}

impl LineView for RecordingLine {
    fn render_quantity(&self, value: &str) {
        self.state.lock().unwrap().displayed = value.to_string();
    }

    fn show_message(&self, message: &str) {
        self.state.lock().unwrap().message = Some(message.to_string());
    }

    fn clear_message(&self) {
        self.state.lock().unwrap().message = None;
    }

    fn set_locked(&self, locked: bool) {
        let mut state = self.state.lock().unwrap();
        state.locked = locked;
        state.lock_history.push(locked);
    }

    fn set_line_total(&self, formatted: &str) {
        self.state.lock().unwrap().line_total = Some(formatted.to_string());
    }

    fn remove(&self) {
        self.state.lock().unwrap().attached = false;
    }

    fn is_attached(&self) -> bool {
        self.state.lock().unwrap().attached
    }

    fn has_focus(&self) -> bool {
        self.state.lock().unwrap().focused
    }

    fn focus(&self) {
        let mut state = self.state.lock().unwrap();
        state.focused = true;
        state.focus_calls += 1;
    }
}

/// Everything a [`RecordingSurface`] has been told.
#[derive(Debug, Clone, Default)]
pub struct SurfaceState {
    pub cart_total: Option<String>,
    pub item_count: Option<u32>,
    pub empty_message: Option<String>,
    pub notices: Vec<Notice>,
}

#[derive(Default)]
pub struct RecordingSurface {
    state: Mutex<SurfaceState>,
}

impl RecordingSurface {
    pub fn state(&self) -> SurfaceState {
        self.state.lock().unwrap().clone()
    }
}

impl CartSurface for RecordingSurface {
    fn set_cart_total(&self, formatted: &str) {
        self.state.lock().unwrap().cart_total = Some(formatted.to_string());
    }

    fn set_item_count(&self, count: u32) {
        self.state.lock().unwrap().item_count = Some(count);
    }

    fn show_empty_cart(&self, message: &str) {
        self.state.lock().unwrap().empty_message = Some(message.to_string());
    }

    fn notify(&self, notice: &Notice) {
        self.state.lock().unwrap().notices.push(notice.clone());
    }
}

/// Button label history: `Some(label)` for busy, `None` for restored.
#[derive(Default)]
pub struct RecordingButton {
    history: Mutex<Vec<Option<String>>>,
}

impl RecordingButton {
    pub fn history(&self) -> Vec<Option<String>> {
        self.history.lock().unwrap().clone()
    }
}

impl SubmitButton for RecordingButton {
    fn set_busy(&self, label: &str) {
        self.history.lock().unwrap().push(Some(label.to_string()));
    }

    fn restore(&self) {
        self.history.lock().unwrap().push(None);
    }
}
