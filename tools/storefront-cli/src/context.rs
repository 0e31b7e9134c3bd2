//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use storefront_auth::{Session, SessionStore};
use storefront_commerce::ids::UserId;
use storefront_data::{ApiClient, HttpCartApi, HttpCatalogApi};
use storefront_sync::{CartEngine, CatalogBrowser};

use crate::config::CliConfig;
use crate::output::{ConsoleNotifier, Output};

/// Config file names, searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file and environment.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            None => match find_config(&cwd) {
                Some(path) => {
                    let config = CliConfig::load(&path.to_string_lossy())?;
                    (config, Some(path))
                }
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config: config.with_env_overrides(),
            output,
            cwd,
            config_path,
        })
    }

    /// HTTP client for the configured API.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config.api).context("Failed to create API client")
    }

    /// Session from the configured access token.
    pub fn sessions(&self) -> SessionStore {
        let session = &self.config.session;
        match &session.access_token {
            Some(token) => {
                let user_id = session
                    .user_id
                    .clone()
                    .unwrap_or_else(|| UserId::new("cli"));
                SessionStore::with_session(Session::new(
                    user_id,
                    session.email.clone(),
                    token.clone(),
                ))
            }
            None => SessionStore::new(),
        }
    }

    /// Product list and search state.
    pub fn catalog(&self) -> Result<CatalogBrowser> {
        Ok(CatalogBrowser::new(
            Arc::new(HttpCatalogApi::new(self.client()?)),
            Arc::new(ConsoleNotifier::new(self.output.clone())),
        ))
    }

    /// Catalog API for single-product lookups.
    pub fn catalog_api(&self) -> Result<HttpCatalogApi> {
        Ok(HttpCatalogApi::new(self.client()?))
    }

    /// Cart engine for the configured session.
    pub fn cart_engine(&self) -> Result<CartEngine> {
        Ok(CartEngine::builder(
            Arc::new(self.sessions()),
            Arc::new(ConsoleNotifier::new(self.output.clone())),
            Arc::new(HttpCartApi::new(self.client()?)),
        )
        .config(self.config.cart)
        .build())
    }

    /// Whether an access token is configured.
    pub fn is_signed_in(&self) -> bool {
        self.config.session.access_token.is_some()
    }

    /// Format a price with the configured currency symbol.
    pub fn price(&self, amount: storefront_commerce::money::Money) -> String {
        amount.display_with(&self.config.display.currency_symbol)
    }
}

/// Find config file in directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
