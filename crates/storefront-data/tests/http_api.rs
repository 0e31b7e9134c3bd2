//! Integration tests for the HTTP API implementations.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_commerce::cart::wire::{CartItemAddRequest, CartItemQuantityUpdateRequest};
use storefront_commerce::cart::CartItemUpdate;
use storefront_commerce::ids::{CartId, ProductId, UserId, VariantId};
use storefront_commerce::money::Money;
use storefront_data::{
    AccessToken, ApiClient, ApiConfig, CartApi, CatalogApi, FetchError, HttpCartApi,
    HttpCatalogApi, HttpUserApi, TimeoutConfig, UserApi,
};

/// Client for tests: short timeouts, no backoff delay, no retries.
fn test_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        timeout: TimeoutConfig::from_total(Duration::from_secs(5)),
        max_retries: 0,
        retry_backoff: Duration::ZERO,
        user_agent: "storefront-test/0.1".to_string(),
    }
}

fn client_with_retries(server: &MockServer, max_retries: u32) -> ApiClient {
    let config = ApiConfig {
        max_retries,
        ..test_config(server)
    };
    ApiClient::new(&config).expect("failed to build test client")
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&test_config(server)).expect("failed to build test client")
}

fn token() -> AccessToken {
    AccessToken::new("tok-123")
}

fn cart_json(quantity: u32) -> serde_json::Value {
    json!({
        "id": "cart-1",
        "cartItems": [{
            "quantity": quantity,
            "cartId": "cart-1",
            "productVariantId": "pv-1",
            "productVariant": {
                "quantity": 5,
                "price": "12.99",
                "product": {
                    "id": "p-1",
                    "name": "Linen Shirt",
                    "productOptions": [{"optionId": "color", "position": 0}],
                    "optionValueImages": []
                },
                "variantOptions": [
                    {"optionValueId": "white", "optionValue": {"name": "White", "option": {"id": "color"}}}
                ]
            }
        }]
    })
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_cart_sends_bearer_token_and_maps_cart() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/v1/cart"))
        .and(query_param("details", "true"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": cart_json(3)})))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCartApi::new(client(&server));
    let cart = api.get_cart(&token()).await.unwrap().expect("cart");

    assert_eq!(cart.id, CartId::new("cart-1"));
    assert_eq!(cart.items[0].cart_item.quantity, 3);
    assert_eq!(cart.items[0].cart_item.product_variant.price, Money::from_cents(1299));
    assert!(!cart.items[0].is_checked);
}

#[tokio::test]
async fn get_cart_returns_none_for_null_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/v1/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let api = HttpCartApi::new(client(&server));
    assert!(api.get_cart(&token()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_items_sends_batch_with_target_quantities() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/public/v1/cart/items"))
        .and(body_json(json!({
            "cartItemList": [
                {"quantity": 5, "productVariantId": "pv-1", "cartId": "cart-1"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": cart_json(5)})))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCartApi::new(client(&server));
    let updates = vec![CartItemUpdate {
        product_variant_id: VariantId::new("pv-1"),
        new_quantity: 5,
        previous_quantity: 3,
        cart_id: CartId::new("cart-1"),
    }];
    let cart = api.update_items(&token(), &updates).await.unwrap().unwrap();

    assert_eq!(cart.items[0].cart_item.quantity, 5);
}

#[tokio::test]
async fn mutations_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/public/v1/cart/items"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCartApi::new(client_with_retries(&server, 3));
    let err = api.update_items(&token(), &[]).await.unwrap_err();

    assert!(matches!(err, FetchError::Http { status: 503, .. }));
}

#[tokio::test]
async fn set_item_quantity_patches_single_item() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/public/v1/cart/items/pv-1"))
        .and(query_param("details", "true"))
        .and(body_json(json!({"quantity": 4, "cartId": "cart-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": cart_json(4)})))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCartApi::new(client(&server));
    let request = CartItemQuantityUpdateRequest {
        quantity: 4,
        cart_id: CartId::new("cart-1"),
    };
    let cart = api
        .set_item_quantity(&token(), &VariantId::new("pv-1"), &request)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(cart.quantity_of(&VariantId::new("pv-1")), Some(4));
}

#[tokio::test]
async fn add_item_ignores_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/public/v1/cart/items"))
        .and(body_json(json!({"quantity": 2, "productVariantId": "pv-1"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCartApi::new(client(&server));
    let request = CartItemAddRequest {
        quantity: 2,
        product_variant_id: VariantId::new("pv-1"),
    };
    api.add_item(&token(), &request).await.unwrap();
}

#[tokio::test]
async fn delete_item_sends_ids_as_query_and_reads_message_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/public/v1/cart/items"))
        .and(query_param("cartId", "cart-1"))
        .and(query_param("productVariantId", "pv-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Cart item removed.",
            "data": {"id": "cart-1", "cartItems": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCartApi::new(client(&server));
    let cart = api
        .delete_item(&token(), &CartId::new("cart-1"), &VariantId::new("pv-1"))
        .await
        .unwrap()
        .unwrap();

    assert!(cart.is_empty());
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_products_omits_empty_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/v1/products"))
        .and(query_param_is_missing("query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "p-1", "name": "Tee", "defaultVariant": {"price": "19.90"}, "productImages": [{"url": "tee.png"}]}
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let api = HttpCatalogApi::new(client(&server));
    let products = api.list_products(None).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].image_url, "tee.png");

    api.list_products(Some("   ")).await.unwrap();
}

#[tokio::test]
async fn list_products_passes_search_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/v1/products"))
        .and(query_param("query", "linen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCatalogApi::new(client(&server));
    assert!(api.list_products(Some("linen")).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_product_returns_none_for_null_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/v1/products/p-404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let api = HttpCatalogApi::new(client(&server));
    assert!(api.get_product(&ProductId::new("p-404")).await.unwrap().is_none());
}

#[tokio::test]
async fn rate_limit_carries_response_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/v1/products"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests."))
        .mount(&server)
        .await;

    let api = HttpCatalogApi::new(client_with_retries(&server, 2));
    let err = api.list_products(None).await.unwrap_err();

    match err {
        FetchError::RateLimited { message, .. } => assert_eq!(message, "Too many requests."),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn reads_are_retried_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/v1/products"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/public/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCatalogApi::new(client_with_retries(&server, 1));
    assert!(api.list_products(None).await.is_ok());
}

#[tokio::test]
async fn malformed_body_is_deserialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let api = HttpCatalogApi::new(client(&server));
    let err = api.list_products(None).await.unwrap_err();
    assert!(matches!(err, FetchError::Deserialization(_)));
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_user_registers_identity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .and(body_json(json!({"id": "user-1", "email": "a@example.com"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpUserApi::new(client(&server));
    api.create_user(&UserId::new("user-1"), "a@example.com")
        .await
        .unwrap();
}
