//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Store origin the cart endpoints hang off
//!   (e.g., `https://ammonader.myshopify.com/` or a locale root like `/ar/`)
//!
//! ## Optional
//! - `STOREFRONT_MONEY_FORMAT` - Money template (default: `LE {{amount}}`)
//! - `STOREFRONT_QUANTITY_DEBOUNCE_MS` - Quantity edit debounce (default: 500)
//! - `STOREFRONT_DEFAULT_MAX_QUANTITY` - Stepper ceiling for lines without an
//!   inventory limit (default: 999)
//! - `STOREFRONT_REQUEST_TIMEOUT_SECS` - Cart request timeout (default: none)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::time::Duration;

use ammonader_core::{DEFAULT_MONEY_FORMAT, MoneyFormat};
use thiserror::Error;
use url::Url;

/// Debounce delay applied to quantity edits unless configured otherwise.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Stepper ceiling for lines whose inventory limit is unknown.
pub const DEFAULT_MAX_QUANTITY: u32 = 999;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Store origin the cart endpoints are resolved against
    pub base_url: Url,
    /// Money display template
    pub money_format: MoneyFormat,
    /// Quantity control behaviour
    pub quantity: QuantitySettings,
    /// Optional transport timeout for cart requests
    pub request_timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Tunables for the cart quantity controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantitySettings {
    /// Quiet period before an edit is written to the cart
    pub debounce: Duration,
    /// Ceiling used by the stepper when a line has no maximum
    pub default_max: u32,
}

impl Default for QuantitySettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            default_max: DEFAULT_MAX_QUANTITY,
        }
    }
}

impl StorefrontConfig {
    /// Configuration with defaults for everything except the store URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            money_format: MoneyFormat::default(),
            quantity: QuantitySettings::default(),
            request_timeout: None,
            sentry_dsn: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let base_url = env
            .required("STOREFRONT_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
            })?;
        let money_format = env
            .or_default("STOREFRONT_MONEY_FORMAT", DEFAULT_MONEY_FORMAT)
            .parse::<MoneyFormat>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_MONEY_FORMAT".to_string(), e.to_string())
            })?;

        let debounce_ms = env.parsed("STOREFRONT_QUANTITY_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        let default_max = env.parsed("STOREFRONT_DEFAULT_MAX_QUANTITY", DEFAULT_MAX_QUANTITY)?;
        if default_max == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_DEFAULT_MAX_QUANTITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let request_timeout = env
            .optional("STOREFRONT_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "STOREFRONT_REQUEST_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            base_url,
            money_format,
            quantity: QuantitySettings {
                debounce: Duration::from_millis(debounce_ms),
                default_max,
            },
            request_timeout,
            sentry_dsn: env.optional("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual required/optional/default accessors.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
