//! Product catalog module.
//!
//! Contains catalog entities, their wire records and mapper, and the variant
//! selection engine.

mod mapper;
mod product;
mod selection;
pub mod wire;

pub use mapper::{to_product, to_product_detail, to_products};
pub(crate) use mapper::to_product_option;
pub use product::{
    OptionType, OptionValue, OptionValueImage, Product, ProductDetail, ProductImage,
    ProductOption, ProductVariant, VariantOption,
};
pub use selection::{
    current_price, PendingAdd, PvOption, PvOptionValue, VariantSelector, MAX_OPTION_AXES,
};
