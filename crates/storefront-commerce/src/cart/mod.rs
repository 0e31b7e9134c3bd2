//! Shopping cart module.
//!
//! Contains cart entities, the cart reducer, and the cart wire records and
//! mapper.

mod cart;
mod mapper;
mod state;
pub mod wire;

pub use cart::{
    Cart, CartItem, CartItemAndSelection, CartItemUpdate, CartOptionValueImage, CartProduct,
    CartProductVariant, CartVariantOption,
};
pub use mapper::{to_cart, to_cart_item_update_request};
pub use state::{CartAction, CartState, CartStatus};
