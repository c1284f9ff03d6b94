//! Per-line quantity control state machine.
//!
//! [`QuantityControl`] is pure state: it decides what an edit or a commit
//! means and leaves I/O and view updates to
//! [`QuantitySynchronizer`](super::QuantitySynchronizer).
//!
//! ```text
//!            edit                 commit starts
//!   Idle ──────────► Idle ─────────────────────► PendingWrite
//!    ▲  ▲                                          │   │   │
//!    │  └──────────── confirmed (no clamp) ────────┘   │   │ confirmed 0
//!    │                                                 │   ▼
//!    │ edit clears   ErrorShown ◄── failed / clamped ──┘  Removed
//!    └────────────── (limit, update failed)
//! ```

use ammonader_core::LineKey;

/// Stepper direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Increment,
    Decrement,
}

/// Inline message attached to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineMessage {
    /// Only `available` units can be ordered.
    Limit { available: u32 },
    /// The last write failed and the quantity was reverted.
    UpdateFailed,
}

/// Lifecycle state of one quantity control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlState {
    /// Editable, no message visible.
    Idle,
    /// A write is in flight; the row is locked. `notice` is the clamp message
    /// shown while the write runs, if any.
    PendingWrite { notice: Option<LineMessage> },
    /// Editable with an inline message visible.
    ErrorShown(LineMessage),
    /// The server confirmed quantity 0 and the row is gone. Terminal.
    Removed,
}

/// Why a displayed value cannot be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum QuantityInputError {
    #[error("quantity is not a number")]
    NotANumber,
    #[error("quantity is negative")]
    Negative,
}

/// Parse a typed quantity the way a browser reads a number field: leading
/// whitespace is skipped and the leading integer is taken, so `"3abc"` and
/// `"2.5"` read as 3 and 2. The product-page stepper uses the same rule.
///
/// Values past `u32::MAX` saturate, which the commit path then clamps to the
/// line maximum.
///
/// # Errors
///
/// Returns an error when there is no leading integer or it is negative.
pub fn parse_quantity(raw: &str) -> Result<u32, QuantityInputError> {
    match leading_int(raw) {
        None => Err(QuantityInputError::NotANumber),
        Some(value) if value < 0 => Err(QuantityInputError::Negative),
        Some(value) => Ok(u32::try_from(value).unwrap_or(u32::MAX)),
    }
}

/// Leading integer of a form value, saturating at the `i64` range.
pub(crate) fn leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(sign * digits.parse::<i64>().unwrap_or(i64::MAX))
}

/// Result of a stepper click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The displayed value is now `value`; a commit should be scheduled.
    Stepped { value: u32, message_cleared: bool },
    /// Increment refused at the ceiling; the limit message is now shown.
    LimitReached { available: u32 },
    /// The row is locked or removed, or the input holds no valid quantity.
    Ignored,
}

/// What a commit should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPlan {
    /// Write `quantity`. `clamped_to` is set when the typed value exceeded the
    /// line maximum.
    Send {
        quantity: u32,
        clamped_to: Option<u32>,
    },
    /// The displayed value is not a valid quantity; do nothing.
    Invalid(QuantityInputError),
    /// A write is already in flight.
    Busy,
    /// The row is gone.
    Removed,
}

/// One editable quantity field for one cart line.
#[derive(Debug, Clone)]
pub struct QuantityControl {
    key: LineKey,
    displayed: String,
    confirmed: u32,
    max: Option<u32>,
    state: ControlState,
}

impl QuantityControl {
    /// A control for a freshly rendered row showing `confirmed` units.
    #[must_use]
    pub fn new(key: LineKey, confirmed: u32, max: Option<u32>) -> Self {
        Self {
            key,
            displayed: confirmed.to_string(),
            confirmed,
            max,
            state: ControlState::Idle,
        }
    }

    /// Line key this control edits.
    #[must_use]
    pub const fn key(&self) -> &LineKey {
        &self.key
    }

    /// Raw value in the input.
    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Last quantity the server accepted.
    #[must_use]
    pub const fn confirmed(&self) -> u32 {
        self.confirmed
    }

    /// Inventory limit, if known.
    #[must_use]
    pub const fn max(&self) -> Option<u32> {
        self.max
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ControlState {
        self.state
    }

    /// Whether edits are currently refused.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        matches!(
            self.state,
            ControlState::PendingWrite { .. } | ControlState::Removed
        )
    }

    /// Stepper click. `default_max` applies when the line has no maximum.
    pub fn step(&mut self, direction: Direction, default_max: u32) -> StepOutcome {
        if self.is_locked() {
            return StepOutcome::Ignored;
        }

        // Unparsable input never turns into a write.
        let Ok(current) = parse_quantity(&self.displayed) else {
            return StepOutcome::Ignored;
        };
        match direction {
            Direction::Increment => {
                let ceiling = self.max.unwrap_or(default_max);
                if current >= ceiling {
                    self.state = ControlState::ErrorShown(LineMessage::Limit {
                        available: ceiling,
                    });
                    return StepOutcome::LimitReached { available: ceiling };
                }
                self.set_displayed(current + 1);
                StepOutcome::Stepped {
                    value: current + 1,
                    message_cleared: self.clear_message(),
                }
            }
            Direction::Decrement if current == 0 => {
                self.set_displayed(0);
                StepOutcome::Stepped {
                    value: 0,
                    message_cleared: false,
                }
            }
            Direction::Decrement => {
                self.set_displayed(current - 1);
                StepOutcome::Stepped {
                    value: current - 1,
                    message_cleared: self.clear_message(),
                }
            }
        }
    }

    /// Typed input. Returns `false` if the row is locked and the edit was dropped.
    pub fn input(&mut self, raw: &str) -> bool {
        if self.is_locked() {
            return false;
        }
        raw.clone_into(&mut self.displayed);
        true
    }

    /// Validate the displayed value and, if it can be written, enter
    /// [`ControlState::PendingWrite`].
    pub fn begin_commit(&mut self) -> CommitPlan {
        match self.state {
            ControlState::Removed => return CommitPlan::Removed,
            ControlState::PendingWrite { .. } => return CommitPlan::Busy,
            ControlState::Idle | ControlState::ErrorShown(_) => {}
        }

        let mut quantity = match parse_quantity(&self.displayed) {
            Ok(quantity) => quantity,
            Err(e) => return CommitPlan::Invalid(e),
        };

        let mut clamped_to = None;
        if let Some(max) = self.max
            && quantity > max
        {
            quantity = max;
            clamped_to = Some(max);
            self.set_displayed(max);
        }

        self.state = ControlState::PendingWrite {
            notice: clamped_to.map(|available| LineMessage::Limit { available }),
        };
        CommitPlan::Send {
            quantity,
            clamped_to,
        }
    }

    /// The server accepted `quantity`.
    pub fn confirm(&mut self, quantity: u32) -> ControlState {
        let notice = match self.state {
            ControlState::PendingWrite { notice } => notice,
            _ => None,
        };

        self.confirmed = quantity;
        self.set_displayed(quantity);
        self.state = if quantity == 0 {
            ControlState::Removed
        } else {
            notice.map_or(ControlState::Idle, ControlState::ErrorShown)
        };
        self.state
    }

    /// The write failed. Reverts the displayed value and returns it.
    pub fn fail(&mut self) -> u32 {
        self.set_displayed(self.confirmed);
        self.state = ControlState::ErrorShown(LineMessage::UpdateFailed);
        self.confirmed
    }

    fn set_displayed(&mut self, value: u32) {
        self.displayed = value.to_string();
    }

    /// Drop any visible message; returns whether one was visible.
    fn clear_message(&mut self) -> bool {
        let had_message = matches!(self.state, ControlState::ErrorShown(_));
        self.state = ControlState::Idle;
        had_message
    }
}
