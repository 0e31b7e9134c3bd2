//! `reqwest` implementations of the remote APIs.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use storefront_commerce::cart::wire::{
    CartDto, CartItemAddRequest, CartItemBatchUpdateRequest, CartItemQuantityUpdateRequest,
};
use storefront_commerce::cart::{to_cart, to_cart_item_update_request, Cart, CartItemUpdate};
use storefront_commerce::catalog::wire::{ProductDetailDto, ProductDto};
use storefront_commerce::catalog::{to_product_detail, to_products, Product, ProductDetail};
use storefront_commerce::ids::{CartId, ProductId, UserId, VariantId};

use crate::api::{CartApi, CatalogApi, UserApi};
use crate::client::{AccessToken, ApiClient, FetchError};
use crate::endpoint::EndpointTag;

const DETAILS: (&str, &str) = ("details", "true");

/// Cart API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    client: ApiClient,
}

impl HttpCartApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn get_cart(&self, token: &AccessToken) -> Result<Option<Cart>, FetchError> {
        let url = self.client.url(EndpointTag::Cart, "");
        let envelope = self
            .client
            .get::<Option<CartDto>>(EndpointTag::Cart, &url, &[DETAILS], Some(token))
            .await?;
        Ok(envelope.data.map(to_cart))
    }

    async fn add_item(
        &self,
        token: &AccessToken,
        request: &CartItemAddRequest,
    ) -> Result<(), FetchError> {
        let url = self.client.url(EndpointTag::Cart, "/items");
        self.client
            .send_discarding(EndpointTag::Cart, Method::POST, &url, Some(request), Some(token))
            .await
    }

    async fn set_item_quantity(
        &self,
        token: &AccessToken,
        variant_id: &VariantId,
        request: &CartItemQuantityUpdateRequest,
    ) -> Result<Option<Cart>, FetchError> {
        let url = self
            .client
            .url(EndpointTag::Cart, &format!("/items/{}", variant_id));
        self.send_for_cart(Method::PATCH, &url, &[DETAILS], Some(request), token)
            .await
    }

    async fn update_items(
        &self,
        token: &AccessToken,
        updates: &[CartItemUpdate],
    ) -> Result<Option<Cart>, FetchError> {
        let url = self.client.url(EndpointTag::Cart, "/items");
        let body = CartItemBatchUpdateRequest {
            cart_item_list: updates.iter().map(to_cart_item_update_request).collect(),
        };
        self.send_for_cart(Method::PATCH, &url, &[], Some(&body), token)
            .await
    }

    async fn delete_item(
        &self,
        token: &AccessToken,
        cart_id: &CartId,
        variant_id: &VariantId,
    ) -> Result<Option<Cart>, FetchError> {
        let url = self.client.url(EndpointTag::Cart, "/items");
        let query = [
            ("cartId", cart_id.as_str()),
            ("productVariantId", variant_id.as_str()),
        ];
        self.send_for_cart::<()>(Method::DELETE, &url, &query, None, token)
            .await
    }
}

impl HttpCartApi {
    async fn send_for_cart<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        token: &AccessToken,
    ) -> Result<Option<Cart>, FetchError> {
        let envelope = self
            .client
            .send::<B, Option<CartDto>>(EndpointTag::Cart, method, url, query, body, Some(token))
            .await?;
        if let Some(message) = envelope.message.as_deref() {
            tracing::debug!(message, "Cart API message");
        }
        Ok(envelope.data.map(to_cart))
    }
}

/// Catalog API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: ApiClient,
}

impl HttpCatalogApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_products(&self, query: Option<&str>) -> Result<Vec<Product>, FetchError> {
        let url = self.client.url(EndpointTag::Catalog, "");
        let params: Vec<(&str, &str)> = match query.map(str::trim) {
            Some(q) if !q.is_empty() => vec![("query", q)],
            _ => Vec::new(),
        };
        let envelope = self
            .client
            .get::<Vec<ProductDto>>(EndpointTag::Catalog, &url, &params, None)
            .await?;
        Ok(to_products(envelope.data))
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<ProductDetail>, FetchError> {
        let url = self.client.url(EndpointTag::Catalog, &format!("/{}", id));
        let envelope = self
            .client
            .get::<Option<ProductDetailDto>>(EndpointTag::Catalog, &url, &[], None)
            .await?;
        Ok(envelope.data.map(to_product_detail))
    }
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    id: &'a UserId,
    email: &'a str,
}

/// Account API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUserApi {
    client: ApiClient,
}

impl HttpUserApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn create_user(&self, id: &UserId, email: &str) -> Result<(), FetchError> {
        let url = self.client.url(EndpointTag::Users, "");
        let body = SignUpRequest { id, email };
        self.client
            .send_discarding(EndpointTag::Users, Method::POST, &url, Some(&body), None)
            .await
    }
}
