//! Commerce error types.

use thiserror::Error;

/// Errors raised while interpreting catalog and cart data.
///
/// Most variants are data integrity failures: the catalog served a product
/// whose option configuration cannot be presented safely. Guessing a
/// fallback variant in those cases risks selling the wrong item, so callers
/// should treat the product as unavailable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// An option discovered on a variant has no display position.
    #[error("Option {0} has no configured display position")]
    MissingOptionPosition(String),

    /// A first-axis option value has no bound image.
    #[error("Option value {0} has no image for this product")]
    MissingOptionValueImage(String),

    /// The product's default variant is not among its variants.
    #[error("Default variant {0} not found on product")]
    DefaultVariantMissing(String),

    /// No variant carries the chosen option value.
    #[error("No variant carries option value {0}")]
    NoVariantForValue(String),

    /// The selected option values do not resolve to exactly one variant.
    #[error("No variant matches the selected option values [{0}]")]
    NoMatchingVariant(String),

    /// The variant carries no value on one of the product's option axes.
    #[error("Option {0} has no selected value")]
    IncompleteSelection(String),

    /// The product has more option axes than the selector supports.
    #[error("Product has {found} option axes, at most {supported} are supported")]
    UnsupportedOptionAxes { found: usize, supported: usize },

    /// The axis index/option id pair does not name an axis of the product.
    #[error("Unknown option axis {0}")]
    UnknownOptionAxis(String),

    /// The option value is not offered on the given axis.
    #[error("Option value {0} is not offered on this axis")]
    UnknownOptionValue(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// A price string could not be parsed as a decimal amount.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

impl CommerceError {
    /// Check if this error means the catalog data itself is inconsistent.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            CommerceError::MissingOptionPosition(_)
                | CommerceError::MissingOptionValueImage(_)
                | CommerceError::DefaultVariantMissing(_)
                | CommerceError::NoVariantForValue(_)
                | CommerceError::NoMatchingVariant(_)
                | CommerceError::IncompleteSelection(_)
                | CommerceError::UnsupportedOptionAxes { .. }
        )
    }
}
