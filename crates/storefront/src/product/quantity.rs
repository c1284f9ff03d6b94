//! Product-page quantity field.

use crate::cart::control::leading_int;

/// Lower bound when the field declares none.
pub const DEFAULT_MIN: u32 = 1;

/// Upper bound when the field declares none.
pub const DEFAULT_MAX: u32 = 999;

/// The `-`/`+` stepper next to the add-to-cart button.
///
/// Unlike the cart controls this never talks to the server; it only keeps
/// the field within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStepper {
    min: u32,
    max: u32,
}

impl Default for QuantityStepper {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

impl QuantityStepper {
    /// Build from the field's `min`/`max` attributes. Missing, zero or
    /// unparsable attributes fall back to the defaults.
    #[must_use]
    pub fn from_attributes(min: Option<&str>, max: Option<&str>) -> Self {
        let attr = |raw: Option<&str>, default: u32| {
            raw.and_then(|raw| raw.trim().parse::<u32>().ok())
                .filter(|&value| value > 0)
                .unwrap_or(default)
        };
        let min = attr(min, DEFAULT_MIN);
        Self {
            min,
            max: attr(max, DEFAULT_MAX).max(min),
        }
    }

    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// `-` click. Unparsable values count as 1.
    #[must_use]
    pub fn decrement(&self, raw: &str) -> u32 {
        let current = current_value(raw);
        if current > self.min {
            current - 1
        } else {
            current
        }
    }

    /// `+` click. Unparsable values count as 1.
    #[must_use]
    pub fn increment(&self, raw: &str) -> u32 {
        let current = current_value(raw);
        if current < self.max {
            current + 1
        } else {
            current
        }
    }

    /// Blur: unparsable values become `min`, everything is clamped.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> u32 {
        leading_int(raw)
            .filter(|&value| value != 0)
            .map_or(self.min, |value| {
                u32::try_from(value.clamp(i64::from(self.min), i64::from(self.max)))
                    .unwrap_or(self.min)
            })
    }
}

/// Displayed value for the stepper buttons; zero and junk read as 1.
fn current_value(raw: &str) -> u32 {
    leading_int(raw)
        .filter(|&value| value > 0)
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let stepper = QuantityStepper::default();
        assert_eq!((stepper.min(), stepper.max()), (1, 999));
        assert_eq!(
            QuantityStepper::from_attributes(Some("0"), Some("abc")),
            stepper
        );
        assert_eq!(QuantityStepper::from_attributes(None, None), stepper);
    }

    #[test]
    fn test_increment_and_decrement() {
        let stepper = QuantityStepper::from_attributes(Some("2"), Some("5"));
        assert_eq!(stepper.increment("3"), 4);
        assert_eq!(stepper.increment("5"), 5);
        assert_eq!(stepper.decrement("3"), 2);
        assert_eq!(stepper.decrement("2"), 2);
    }

    #[test]
    fn test_junk_counts_as_one() {
        let stepper = QuantityStepper::default();
        assert_eq!(stepper.increment(""), 2);
        assert_eq!(stepper.increment("abc"), 2);
        assert_eq!(stepper.increment("0"), 2);
        assert_eq!(stepper.decrement("abc"), 1);
    }

    #[test]
    fn test_normalize() {
        let stepper = QuantityStepper::from_attributes(Some("1"), Some("10"));
        assert_eq!(stepper.normalize("4"), 4);
        assert_eq!(stepper.normalize("12abc"), 10);
        assert_eq!(stepper.normalize("-3"), 1);
        assert_eq!(stepper.normalize(""), 1);
        assert_eq!(stepper.normalize("0"), 1);
        assert_eq!(stepper.normalize("99999999999999999999"), 10);
    }
}
