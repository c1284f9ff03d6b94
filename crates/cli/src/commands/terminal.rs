//! Cart views that log to the terminal.

use std::sync::atomic::{AtomicBool, Ordering};

use ammonader_storefront::cart::{CartSurface, LineView, Notice, NoticeKind, SubmitButton};
use tracing::{debug, info, warn};

/// Logs every row, page and button update as a structured event.
#[derive(Debug)]
pub struct TerminalView {
    attached: AtomicBool,
}

impl TerminalView {
    pub const fn new() -> Self {
        Self {
            attached: AtomicBool::new(true),
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl LineView for TerminalView {
    fn render_quantity(&self, value: &str) {
        info!(quantity = value, "Quantity input");
    }

    fn show_message(&self, message: &str) {
        warn!("{message}");
    }

    fn clear_message(&self) {}

    fn set_locked(&self, locked: bool) {
        debug!(locked, "Line lock");
    }

    fn set_line_total(&self, formatted: &str) {
        info!(line_total = formatted, "Line total");
    }

    fn remove(&self) {
        self.attached.store(false, Ordering::Relaxed);
        info!("Line removed");
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Relaxed)
    }

    // There is no input to focus.
    fn has_focus(&self) -> bool {
        true
    }

    fn focus(&self) {}
}

impl CartSurface for TerminalView {
    fn set_cart_total(&self, formatted: &str) {
        info!(total = formatted, "Cart total");
    }

    fn set_item_count(&self, count: u32) {
        info!(item_count = count, "Cart count");
    }

    fn show_empty_cart(&self, message: &str) {
        info!("{message}");
    }

    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => info!(kind = notice.kind.as_str(), "{}", notice.message),
            NoticeKind::Error => warn!(kind = notice.kind.as_str(), "{}", notice.message),
        }
    }
}

impl SubmitButton for TerminalView {
    fn set_busy(&self, label: &str) {
        info!("{label}");
    }

    fn restore(&self) {}
}
