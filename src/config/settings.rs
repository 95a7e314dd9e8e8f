//! Configuration settings for Coinwatch.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Market-data API configuration.
    pub api: ApiConfig,
    /// Authentication backend configuration.
    pub auth: AuthConfig,
    /// Price-alert worker configuration.
    pub worker: WorkerConfig,
    /// Logging configuration.
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from file, returning default if file doesn't exist or fails.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(|| {
            super::config_dir()
                .map(|p| p.join("config.toml"))
                .unwrap_or_else(|_| PathBuf::from("config.toml"))
        });

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(|| {
            super::config_dir()
                .map(|p| p.join("config.toml"))
                .unwrap_or_else(|_| PathBuf::from("config.toml"))
        });

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Market-data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL.
    pub base_url: String,
    /// Quote currency for prices.
    pub currency: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Rate limit (requests per second).
    pub rate_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coinstats.app/public/v1".to_string(),
            currency: "USD".to_string(),
            timeout_secs: 30,
            rate_limit: 10,
        }
    }
}

/// Authentication backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Auth endpoint base URL.
    pub base_url: String,
    /// Free-plan favorite limit.
    pub favorites_limit: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "https://auth.coinwatch.dev/v1".to_string(),
            favorites_limit: 3,
        }
    }
}

/// Price-alert worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Interval between alert runs in seconds.
    pub interval_secs: u64,
    /// Coin watched for non-premium alerts.
    pub reference_coin: String,
    /// Threshold magnitude (percent) for premium per-coin alerts.
    pub threshold_percent: Decimal,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 900,
            reference_coin: "bitcoin".to_string(),
            threshold_percent: dec!(5),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Write logs to a rolling file under the data directory.
    pub file_logging: bool,
    /// Directory override for log files.
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_logging: false,
            directory: None,
        }
    }
}
