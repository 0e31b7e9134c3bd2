//! Product list and search state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_commerce::catalog::Product;
use storefront_data::{CatalogApi, FetchError};

use crate::notify::{Notice, Notifier};

/// Status of the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Initial,
    Loading,
    Refreshing,
    Success,
    Failure,
}

/// Status of the current search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    #[default]
    Initial,
    Searching,
    Success,
    Failure,
}

/// What went wrong with the last load or search. Request details stay in
/// the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogErrorKind {
    /// The server could not be reached in time.
    Network,
    RateLimited,
    /// The server answered with an error status.
    Server,
    /// The response could not be read.
    InvalidResponse,
}

impl From<&FetchError> for CatalogErrorKind {
    fn from(e: &FetchError) -> Self {
        match e {
            FetchError::Timeout(_) | FetchError::Connection(_) | FetchError::Request(_) => {
                Self::Network
            }
            FetchError::RateLimited { .. } => Self::RateLimited,
            FetchError::Http { .. } => Self::Server,
            FetchError::Deserialization(_) => Self::InvalidResponse,
        }
    }
}

/// Product list and search state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogState {
    pub status: LoadStatus,
    pub products: Vec<Product>,
    /// Kind of the last load or search error.
    pub error: Option<CatalogErrorKind>,
    pub is_search_mode: bool,
    pub search_input: String,
    pub filtered_products: Vec<Product>,
    pub search_status: SearchStatus,
}

/// Loads the product list and runs searches.
pub struct CatalogBrowser {
    api: Arc<dyn CatalogApi>,
    notifier: Arc<dyn Notifier>,
    state: CatalogState,
}

impl CatalogBrowser {
    pub fn new(api: Arc<dyn CatalogApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: CatalogState::default(),
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Products to show: search results in search mode, the full list
    /// otherwise.
    pub fn visible_products(&self) -> &[Product] {
        if self.state.is_search_mode {
            &self.state.filtered_products
        } else {
            &self.state.products
        }
    }

    /// Load the full product list.
    pub async fn load(&mut self) -> LoadStatus {
        self.fetch(false).await
    }

    /// Reload the product list without the blocking status.
    pub async fn refresh(&mut self) -> LoadStatus {
        self.fetch(true).await
    }

    async fn fetch(&mut self, refresh: bool) -> LoadStatus {
        self.state.status = if refresh {
            LoadStatus::Refreshing
        } else {
            LoadStatus::Loading
        };

        match self.api.list_products(None).await {
            Ok(products) => {
                tracing::debug!(count = products.len(), refresh, "Products loaded");
                self.state.status = LoadStatus::Success;
                self.state.products = products;
                self.state.error = None;
                if refresh {
                    self.notifier.notify(Notice::CatalogRefreshed);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, refresh, "Product load failed");
                self.state.status = LoadStatus::Failure;
                self.state.error = Some(CatalogErrorKind::from(&e));
                self.notifier.notify(Notice::LoadFailed);
            }
        }
        self.state.status
    }

    pub fn enter_search_mode(&mut self) {
        self.state.is_search_mode = true;
    }

    pub fn set_search_input(&mut self, input: impl Into<String>) {
        self.state.search_input = input.into();
    }

    pub fn clear_search_input(&mut self) {
        self.state.search_input.clear();
    }

    /// Search for the current input. Empty input clears the results without
    /// a request.
    pub async fn submit_search(&mut self) -> SearchStatus {
        let query = self.state.search_input.trim().to_string();
        if query.is_empty() {
            self.state.search_input.clear();
            self.state.filtered_products.clear();
            return self.state.search_status;
        }

        self.state.search_status = SearchStatus::Searching;
        match self.api.list_products(Some(&query)).await {
            Ok(products) => {
                tracing::debug!(%query, count = products.len(), "Search finished");
                self.state.search_status = SearchStatus::Success;
                self.state.filtered_products = products;
                self.state.error = None;
            }
            Err(e) => {
                tracing::warn!(%query, error = %e, "Product search failed");
                self.state.search_status = SearchStatus::Failure;
                self.state.error = Some(CatalogErrorKind::from(&e));
                self.notifier.notify(Notice::LoadFailed);
            }
        }
        self.state.search_status
    }

    /// Leave search mode, dropping input and results.
    pub fn exit_search_mode(&mut self) {
        self.state.is_search_mode = false;
        self.state.search_input.clear();
        self.state.filtered_products.clear();
        self.state.search_status = SearchStatus::Initial;
    }
}
