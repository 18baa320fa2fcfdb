//! Service configuration

use serde::{Deserialize, Serialize};
use verdex_runtime::listener::registry::DEFAULT_CACHE_CAPACITY;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bound on cached listener scopes per kind
    #[serde(default = "default_listener_cache_capacity")]
    pub listener_cache_capacity: usize,

    /// Log level used when this process initializes tracing
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listener_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listener_cache_capacity: default_listener_cache_capacity(),
            log_level: default_log_level(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/service").required(false))
            .add_source(config::Environment::with_prefix("VERDEX"))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }
}
