//! The page surfaces the cart flows write to.
//!
//! These traits stand in for DOM nodes. Implementations must be cheap and
//! non-blocking: they are called from async tasks, never while the
//! synchronizer holds its lock, and they must not call back into the
//! synchronizer synchronously.

/// One cart row: the quantity input, its inline message slot and line total.
pub trait LineView: Send + Sync {
    /// Show `value` in the quantity input.
    fn render_quantity(&self, value: &str);

    /// Show an inline message under the row.
    fn show_message(&self, message: &str);

    /// Hide the inline message.
    fn clear_message(&self);

    /// Lock (disable inputs, dim the row) or unlock the row.
    fn set_locked(&self, locked: bool);

    /// Replace the row's formatted line total.
    fn set_line_total(&self, formatted: &str);

    /// Remove the row from the page.
    fn remove(&self);

    /// Whether the row is still part of the page.
    fn is_attached(&self) -> bool;

    /// Whether the quantity input currently has focus.
    fn has_focus(&self) -> bool;

    /// Move focus to the quantity input.
    fn focus(&self);
}

/// Page-wide cart surfaces: totals, header counter, notifications.
pub trait CartSurface: Send + Sync {
    /// Replace every formatted cart total on the page.
    fn set_cart_total(&self, formatted: &str);

    /// Update every header item-count badge.
    fn set_item_count(&self, count: u32);

    /// Replace the cart container with the empty-state message.
    fn show_empty_cart(&self, message: &str);

    /// Show a transient notification, replacing any visible one.
    ///
    /// Views dismiss notifications on their own (the theme fades them out
    /// after three seconds).
    fn notify(&self, notice: &Notice);
}

/// The add-to-cart submit button.
pub trait SubmitButton: Send + Sync {
    /// Disable the button and show a busy label.
    fn set_busy(&self, label: &str);

    /// Re-enable the button with its original label.
    fn restore(&self);
}

/// Kind of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// CSS modifier the theme uses for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// A success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// An error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}
