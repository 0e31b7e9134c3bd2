//! Storefront domain types and logic.
//!
//! This crate holds everything about the storefront that does not touch the
//! network:
//!
//! - **Catalog**: products, variants, the wire mapper, and the variant
//!   selection engine
//! - **Cart**: cart lines, the wire mapper, and the cart reducer
//! - **Money**: exact decimal prices
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_commerce::prelude::*;
//!
//! let detail = to_product_detail(dto);
//! let mut selector = VariantSelector::new(detail)?;
//! selector.select_option_value(0, &OptionId::new("color"), &OptionValueId::new("black"))?;
//! println!("Total: {}", selector.current_price());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{
        current_price, to_product, to_product_detail, PendingAdd, Product, ProductDetail,
        ProductVariant, PvOption, PvOptionValue, VariantSelector,
    };

    // Cart
    pub use crate::cart::{
        to_cart, Cart, CartAction, CartItem, CartItemAndSelection, CartItemUpdate, CartState,
        CartStatus,
    };
}
