//! Remote data access for the storefront client.
//!
//! This crate provides:
//! - `CartApi` / `CatalogApi` / `UserApi` - Remote collaborators as async traits
//! - `HttpCartApi` / `HttpCatalogApi` / `HttpUserApi` - `reqwest` implementations
//! - `ApiClient` / `ApiConfig` - Shared HTTP plumbing and its configuration
//! - `EndpointTag` - Backend resource families
//! - `TimeoutConfig` - Request timeouts
//! - `RetryPolicy` - Retry strategies for reads

mod api;
mod client;
mod endpoint;
mod http;
mod retry;
mod timeout;

pub use api::*;
pub use client::{AccessToken, ApiClient, ApiConfig, FetchError};
pub use endpoint::*;
pub use http::*;
pub use retry::*;
pub use timeout::*;
