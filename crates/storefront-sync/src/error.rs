//! Errors of the view engines.

use storefront_commerce::error::CommerceError;
use storefront_commerce::ids::ProductId;
use storefront_data::FetchError;
use thiserror::Error;

/// Errors opening a product detail view.
#[derive(Debug, Clone, Error)]
pub enum ViewError {
    #[error("no matching product: {0}")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Catalog(#[from] CommerceError),
}

impl ViewError {
    /// Text shown to the shopper.
    pub fn user_message(&self) -> String {
        match self {
            Self::ProductNotFound(_) => "No matching product.".to_string(),
            Self::Fetch(e) => e
                .user_message()
                .unwrap_or("Something wrong. Please try again later.")
                .to_string(),
            Self::Catalog(_) => "This product is not available.".to_string(),
        }
    }
}
