//! Cart engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_data::duration_ms;

/// Default quiet period before pending quantity writes are sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Cart engine configuration.
///
/// ```toml
/// [cart]
/// debounce = 500
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartEngineConfig {
    /// Quiet period after the last quantity change before the batch is sent.
    #[serde(with = "duration_ms")]
    pub debounce: Duration,
}

impl Default for CartEngineConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl CartEngineConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}
