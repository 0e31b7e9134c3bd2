//! Remote collaborators consumed by the storefront engines.
//!
//! Every method returns mapped entities, never wire records, so engines and
//! test fakes only deal with domain types.

use async_trait::async_trait;
use storefront_commerce::cart::wire::{CartItemAddRequest, CartItemQuantityUpdateRequest};
use storefront_commerce::cart::{Cart, CartItemUpdate};
use storefront_commerce::catalog::{Product, ProductDetail};
use storefront_commerce::ids::{CartId, ProductId, UserId, VariantId};

use crate::client::{AccessToken, FetchError};

/// Remote cart API.
///
/// Operations returning `Option<Cart>` yield `None` when the server reports
/// no cart for the shopper.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// `GET cart?details=true`.
    async fn get_cart(&self, token: &AccessToken) -> Result<Option<Cart>, FetchError>;

    /// `POST cart/items`. Creates the cart if needed.
    async fn add_item(
        &self,
        token: &AccessToken,
        request: &CartItemAddRequest,
    ) -> Result<(), FetchError>;

    /// `PATCH cart/items/{variantId}?details=true`.
    async fn set_item_quantity(
        &self,
        token: &AccessToken,
        variant_id: &VariantId,
        request: &CartItemQuantityUpdateRequest,
    ) -> Result<Option<Cart>, FetchError>;

    /// `PATCH cart/items` with every pending write in one body.
    async fn update_items(
        &self,
        token: &AccessToken,
        updates: &[CartItemUpdate],
    ) -> Result<Option<Cart>, FetchError>;

    /// `DELETE cart/items?cartId=&productVariantId=`.
    async fn delete_item(
        &self,
        token: &AccessToken,
        cart_id: &CartId,
        variant_id: &VariantId,
    ) -> Result<Option<Cart>, FetchError>;
}

/// Remote catalog API.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET products[?query=]`. An empty query lists everything.
    async fn list_products(&self, query: Option<&str>) -> Result<Vec<Product>, FetchError>;

    /// `GET products/{id}`. `None` when no product matches.
    async fn get_product(&self, id: &ProductId) -> Result<Option<ProductDetail>, FetchError>;
}

/// Backend account registration.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `POST /api/v1/users` with the identity provider's user id.
    async fn create_user(&self, id: &UserId, email: &str) -> Result<(), FetchError>;
}
