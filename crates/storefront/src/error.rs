//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends driving the storefront
//! flows. [`AppError::report`] captures errors to Sentry before they are
//! surfaced to the operator.

use thiserror::Error;

use crate::config::ConfigError;
use crate::product::VariantError;
use crate::shopify::ShopifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cart API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Embedded product JSON was unusable.
    #[error("Product error: {0}")]
    Variant(#[from] VariantError),

    /// Money template was invalid.
    #[error("Money format error: {0}")]
    MoneyFormat(#[from] ammonader_core::MoneyFormatError),

    /// Bad input from the operator.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error is worth an error-tracking event.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(self, Self::Shopify(_))
    }

    /// Log the error and, for server-side failures, capture it to Sentry.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::error!(error = %self, "Storefront error");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error. Without an active Sentry client this is a
/// no-op.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Quantity changed", Some(&[("quantity", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("quantity must be a number".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity must be a number");

        let err = AppError::from(ConfigError::MissingEnvVar("STOREFRONT_BASE_URL".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: STOREFRONT_BASE_URL"
        );
    }

    #[test]
    fn test_only_cart_failures_are_reportable() {
        let shopify = AppError::from(ShopifyError::Status {
            status: 500,
            description: None,
        });
        assert!(shopify.is_reportable());
        assert!(!AppError::from(VariantError::NoVariants).is_reportable());
        assert!(!AppError::BadRequest("x".to_string()).is_reportable());
    }

    #[test]
    fn test_breadcrumb_without_client_is_noop() {
        add_breadcrumb("cart", "Quantity changed", Some(&[("quantity", "3")]));
    }
}
