//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::ids::UserId;
use storefront_data::{AccessToken, ApiConfig};
use storefront_observability::LoggingConfig;
use storefront_sync::CartEngineConfig;

/// Overrides `api.base_url`.
pub const ENV_API_BASE_URL: &str = "STOREFRONT_API_BASE_URL";
/// Overrides `session.access_token`.
pub const ENV_ACCESS_TOKEN: &str = "STOREFRONT_ACCESS_TOKEN";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Cart engine settings.
    #[serde(default)]
    pub cart: CartEngineConfig,

    /// Log level and format.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Signed-in shopper.
    #[serde(default)]
    pub session: SessionConfig,

    /// Display preferences.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text; JSON if `path` ends in `.json`, TOML otherwise.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.session.access_token = Some(AccessToken::new(token));
        }
        self
    }
}

/// Session of the shopper using the CLI.
///
/// The CLI does not sign in itself; it uses a token issued by the identity
/// provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bearer token for the cart API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<AccessToken>,

    /// Identity provider user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Email of the shopper.
    #[serde(default)]
    pub email: String,
}

/// Display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Currency symbol printed before prices.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "RM".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    r#"# Storefront client configuration

[api]
base_url = "http://localhost:8080"
max_retries = 2
retry_backoff = 200

[api.timeout]
connect = 3000
request = 15000

[cart]
# Quiet period before quantity changes are sent, in milliseconds
debounce = 500

[logging]
level = "warn"
format = "human"

[session]
# access_token = "..."
# user_id = "..."
email = ""

[display]
currency_symbol = "RM"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use storefront_observability::{LogFormat, LogLevel};

    #[test]
    fn test_default_config_file_parses() {
        let config = CliConfig::parse("storefront.toml", &generate_default_config()).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout.request, Duration::from_secs(15));
        assert_eq!(config.cart.debounce, Duration::from_millis(500));
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Human);
        assert!(config.session.access_token.is_none());
        assert_eq!(config.display.currency_symbol, "RM");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CliConfig::parse("storefront.toml", "").unwrap();
        assert_eq!(config.cart.debounce, Duration::from_millis(500));
        assert_eq!(config.display.currency_symbol, "RM");
    }

    #[test]
    fn test_json_config() {
        let config = CliConfig::parse(
            "storefront.json",
            r#"{"session": {"access_token": "tok", "user_id": "u-1"}, "cart": {"debounce": 100}}"#,
        )
        .unwrap();
        assert_eq!(config.session.access_token, Some(AccessToken::new("tok")));
        assert_eq!(config.session.user_id, Some(UserId::new("u-1")));
        assert_eq!(config.cart.debounce, Duration::from_millis(100));
    }

    #[test]
    fn test_overrides() {
        let env = HashMap::from([
            (ENV_API_BASE_URL, "https://shop.example.com".to_string()),
            (ENV_ACCESS_TOKEN, "  ".to_string()),
        ]);
        let config = CliConfig::default().with_overrides(|key| env.get(key).cloned());

        assert_eq!(config.api.base_url, "https://shop.example.com");
        // blank values do not clear or set anything
        assert!(config.session.access_token.is_none());
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let err = CliConfig::parse("broken.toml", "[api").unwrap_err();
        assert!(format!("{:#}", err).contains("broken.toml"));
    }
}
