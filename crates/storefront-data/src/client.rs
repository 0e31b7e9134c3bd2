//! HTTP client for the storefront backend.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::endpoint::EndpointTag;
use crate::retry::{BackoffStrategy, RetryPolicy};
use crate::timeout::{duration_ms, TimeoutConfig};

/// Error type for API operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    /// HTTP 429. `message` is the server's plain-text explanation.
    #[error("Rate limited by {url}: {message}")]
    RateLimited { url: String, message: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    /// Whether the same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http { status, .. } => *status >= 500,
            FetchError::Timeout(_) | FetchError::Connection(_) => true,
            _ => false,
        }
    }

    /// Message safe to show to a shopper, if the server provided one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            FetchError::RateLimited { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Bearer token issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// API client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend origin, e.g. `https://shop.example.com`.
    pub base_url: String,
    /// Request timeouts.
    pub timeout: TimeoutConfig,
    /// Retries for reads after the first attempt.
    pub max_retries: u32,
    /// Base delay of the exponential read backoff.
    #[serde(with = "duration_ms")]
    pub retry_backoff: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: TimeoutConfig::default(),
            max_retries: 2,
            retry_backoff: Duration::from_millis(200),
            user_agent: format!("storefront/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with everything else defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Retry policy for reads.
    pub fn retry_policy(&self) -> RetryPolicy {
        let backoff = if self.retry_backoff.is_zero() {
            BackoffStrategy::None
        } else {
            BackoffStrategy::Exponential {
                base: self.retry_backoff,
                max: self.retry_backoff * 10,
            }
        };
        RetryPolicy::new(self.max_retries).with_backoff(backoff)
    }
}

/// Every response body is wrapped as `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Shared HTTP plumbing for the API implementations.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .connect_timeout(config.timeout.connect)
            .timeout(config.timeout.request)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry_policy(),
        })
    }

    /// Backend origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path under an endpoint's root.
    pub(crate) fn url(&self, tag: EndpointTag, suffix: &str) -> String {
        format!("{}{}{}", self.base_url, tag.path(), suffix)
    }

    /// GET with retries, decoding the enveloped body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        tag: EndpointTag,
        url: &str,
        query: &[(&str, &str)],
        token: Option<&AccessToken>,
    ) -> Result<Envelope<T>, FetchError> {
        let mut attempt = 0u32;
        loop {
            let request = self.request(Method::GET, url, query, token);
            let result = match self.execute(request, url).await {
                Ok(response) => decode(response, url).await,
                Err(e) => Err(e),
            };

            match result {
                Err(err) if self.retry.should_retry(&err, attempt) => {
                    let delay = self.retry.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        endpoint = %tag,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying API read"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Send a mutation once, decoding the enveloped body.
    pub(crate) async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        tag: EndpointTag,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        token: Option<&AccessToken>,
    ) -> Result<Envelope<T>, FetchError> {
        let response = self.send_raw(tag, method, url, query, body, token).await?;
        decode(response, url).await
    }

    /// Send a mutation once, ignoring the response body.
    pub(crate) async fn send_discarding<B: Serialize + ?Sized>(
        &self,
        tag: EndpointTag,
        method: Method,
        url: &str,
        body: Option<&B>,
        token: Option<&AccessToken>,
    ) -> Result<(), FetchError> {
        self.send_raw(tag, method, url, &[], body, token).await?;
        Ok(())
    }

    async fn send_raw<B: Serialize + ?Sized>(
        &self,
        tag: EndpointTag,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        token: Option<&AccessToken>,
    ) -> Result<Response, FetchError> {
        tracing::debug!(endpoint = %tag, method = %method, url, "API request");
        let mut request = self.request(method, url, query, token);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request, url).await
    }

    fn request(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        token: Option<&AccessToken>,
    ) -> RequestBuilder {
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        request
    }

    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<Response, FetchError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::RateLimited {
                url: url.to_string(),
                message,
            });
        }

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(
    response: Response,
    url: &str,
) -> Result<Envelope<T>, FetchError> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| FetchError::Deserialization(format!("{} from {}", e, url)))
}
