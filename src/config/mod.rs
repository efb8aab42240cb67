//! Configuration management for the scoring service.

use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure for the scoring service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General application settings
    pub app: AppConfig,
    /// Block-explorer (ledger-query) settings
    pub explorer: ExplorerConfig,
    /// Model artifact settings
    pub model: ModelConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

/// Application-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level (debug, info, warn, error)
    pub log_level: String,
}

/// Block-explorer API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Base URL of the explorer API
    pub api_url: String,

    /// API key. Overridden by the `ETHERSCAN_API_KEY` environment
    /// variable when set, so keys never have to live in the config file.
    #[serde(default)]
    pub api_key: String,

    /// Timeout for explorer requests in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum number of transactions fetched per address
    #[serde(default = "default_tx_limit")]
    pub tx_limit: usize,
}

/// Scoring model artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the scoring model artifact (JSON)
    pub model_path: String,
    /// Path to the feature scaler artifact (JSON)
    pub scaler_path: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "127.0.0.1"
    pub host: String,
    /// Bind port
    pub port: u16,
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_tx_limit() -> usize {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig { log_level: "info".to_string() },
            explorer: ExplorerConfig {
                api_url: "https://api.etherscan.io/api".to_string(),
                api_key: String::new(),
                timeout_seconds: default_timeout_seconds(),
                tx_limit: default_tx_limit(),
            },
            model: ModelConfig {
                model_path: "models/trust_score_model.json".to_string(),
                scaler_path: "models/trust_score_scaler.json".to_string(),
            },
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 8000 },
        }
    }
}

impl Config {
    /// Load configuration from a file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides (`ETHERSCAN_API_KEY`)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("ETHERSCAN_API_KEY") {
            if !key.is_empty() {
                self.explorer.api_key = key;
            }
        }
    }

    /// Validate configuration values needed to actually serve requests
    pub fn validate(&self) -> Result<()> {
        if self.explorer.api_key.is_empty() {
            return Err(Error::Config(
                "explorer.api_key is empty (set it in the config file or via ETHERSCAN_API_KEY)"
                    .to_string(),
            ));
        }
        if self.explorer.tx_limit == 0 {
            return Err(Error::Config("explorer.tx_limit must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Generate a commented configuration template
pub fn generate_config_template() -> String {
    r#"# WalletScore configuration

[app]
# Log level: trace, debug, info, warn, error
log_level = "info"

[explorer]
# Etherscan-compatible API endpoint
api_url = "https://api.etherscan.io/api"
# API key (or export ETHERSCAN_API_KEY instead)
api_key = ""
# Per-request timeout in seconds
timeout_seconds = 10
# Maximum transactions fetched per address
tx_limit = 10000

[model]
# Scoring model artifact (JSON)
model_path = "models/trust_score_model.json"
# Feature scaler artifact (JSON)
scaler_path = "models/trust_score_scaler.json"

[server]
host = "127.0.0.1"
port = 8000
"#
    .to_string()
}
