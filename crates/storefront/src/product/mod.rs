//! Product page: variant selection and the quantity field.

mod quantity;
mod variants;

pub use quantity::{DEFAULT_MAX, DEFAULT_MIN, QuantityStepper};
pub use variants::{
    BuyButton, ImageRef, Product, Variant, VariantError, VariantPresentation, variant_url,
};
