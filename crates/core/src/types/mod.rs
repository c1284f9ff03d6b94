//! Core types for the Ammonader storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{AmountStyle, DEFAULT_MONEY_FORMAT, MoneyFormat, MoneyFormatError};
