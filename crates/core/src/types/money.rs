//! Money display formatting.
//!
//! Storefront amounts travel as integer minor units (cents). Display is driven
//! by a shop-level template such as `"LE {{amount}}"` whose placeholder names
//! the separator style:
//!
//! | placeholder | example for `123456789` |
//! |-------------|-------------------------|
//! | `amount` | `1,234,567.89` |
//! | `amount_no_decimals` | `1,234,568` |
//! | `amount_with_comma_separator` | `1.234.567,89` |
//! | `amount_no_decimals_with_comma_separator` | `1.234.568` |
//!
//! ```
//! use ammonader_core::MoneyFormat;
//!
//! let format = MoneyFormat::parse("LE {{amount}}").unwrap();
//! assert_eq!(format.format(150_000), "LE 1,500.00");
//! ```

use core::fmt;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("Invalid regex"));

/// Template used when the shop does not configure one.
pub const DEFAULT_MONEY_FORMAT: &str = "LE {{amount}}";

/// Errors that can occur when parsing a [`MoneyFormat`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyFormatError {
    /// The template has no `{{ ... }}` placeholder.
    #[error("money format must contain a {{{{amount}}}} placeholder")]
    MissingPlaceholder,
    /// The placeholder names a style this formatter does not know.
    #[error("unknown money placeholder: {0}")]
    UnknownPlaceholder(String),
}

/// Separator and precision style selected by the template placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountStyle {
    Amount,
    AmountNoDecimals,
    AmountWithCommaSeparator,
    AmountNoDecimalsWithCommaSeparator,
}

impl AmountStyle {
    fn from_placeholder(name: &str) -> Option<Self> {
        match name {
            "amount" => Some(Self::Amount),
            "amount_no_decimals" => Some(Self::AmountNoDecimals),
            "amount_with_comma_separator" => Some(Self::AmountWithCommaSeparator),
            "amount_no_decimals_with_comma_separator" => {
                Some(Self::AmountNoDecimalsWithCommaSeparator)
            }
            _ => None,
        }
    }

    const fn precision(self) -> u32 {
        match self {
            Self::Amount | Self::AmountWithCommaSeparator => 2,
            Self::AmountNoDecimals | Self::AmountNoDecimalsWithCommaSeparator => 0,
        }
    }

    /// `(thousands, decimal)` separators.
    const fn separators(self) -> (char, char) {
        match self {
            Self::Amount | Self::AmountNoDecimals => (',', '.'),
            Self::AmountWithCommaSeparator | Self::AmountNoDecimalsWithCommaSeparator => {
                ('.', ',')
            }
        }
    }
}

/// A validated money display template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    template: String,
    style: AmountStyle,
}

impl MoneyFormat {
    /// Parse a template such as `"LE {{amount}}"` or `"{{ amount_no_decimals }} ج.م"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template has no placeholder or the first
    /// placeholder is not one of the four supported styles.
    pub fn parse(template: &str) -> Result<Self, MoneyFormatError> {
        let captures = PLACEHOLDER_RE
            .captures(template)
            .ok_or(MoneyFormatError::MissingPlaceholder)?;
        let name = captures.get(1).map_or("", |m| m.as_str());
        let style = AmountStyle::from_placeholder(name)
            .ok_or_else(|| MoneyFormatError::UnknownPlaceholder(name.to_owned()))?;

        Ok(Self {
            template: template.to_owned(),
            style,
        })
    }

    /// The raw template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The separator style picked from the placeholder.
    #[must_use]
    pub const fn style(&self) -> AmountStyle {
        self.style
    }

    /// Format an amount given in minor units.
    #[must_use]
    pub fn format(&self, cents: i64) -> String {
        let value = format_with_delimiters(cents, self.style);
        PLACEHOLDER_RE
            .replace(&self.template, NoExpand(&value))
            .into_owned()
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_MONEY_FORMAT.to_owned(),
            style: AmountStyle::Amount,
        }
    }
}

impl fmt::Display for MoneyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl std::str::FromStr for MoneyFormat {
    type Err = MoneyFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Render `cents / 100` with the style's precision and separators.
fn format_with_delimiters(cents: i64, style: AmountStyle) -> String {
    let precision = style.precision();
    let (thousands, decimal) = style.separators();

    let amount = Decimal::new(cents, 2)
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let digits = format!("{:.*}", precision as usize, amount.abs());

    let (whole, fraction) = digits
        .split_once('.')
        .map_or((digits.as_str(), None), |(w, f)| (w, Some(f)));

    let mut out = String::with_capacity(digits.len() + whole.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(thousands);
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push(decimal);
        out.push_str(fraction);
    }
    out
}
