//! Money formatting command.
//!
//! # Usage
//!
//! ```bash
//! ammo-cli money 150000
//! ammo-cli money 150000 --format "{{amount_with_comma_separator}} LE"
//! ```

use ammonader_core::MoneyFormat;
use ammonader_storefront::error::Result;

/// Format `cents` with `template`, else the configured format, else the default.
///
/// # Errors
///
/// Returns an error if `template` is not a valid money template.
pub fn format(cents: i64, template: Option<&str>, configured: Option<MoneyFormat>) -> Result<String> {
    let money = match template {
        Some(template) => MoneyFormat::parse(template)?,
        None => configured.unwrap_or_default(),
    };

    let formatted = money.format(cents);
    tracing::info!(cents, template = money.template(), "{formatted}");
    Ok(formatted)
}
