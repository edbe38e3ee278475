/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description: 설정 로드 (기본값 -> 설정 파일 -> 환경 변수)
**/

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::StockError;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Local request budget; 0 disables the guard.
    pub max_requests_per_minute: u32,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub search_ms: u64,
    pub overview_ms: u64,
    pub top_movers_ms: u64,
    pub time_series_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration: defaults, then `stocktrack.{toml,json,yaml}` if present,
    /// then `STOCKTRACK_<SECTION>__<KEY>` environment variables.
    pub fn load() -> Result<Self, StockError> {
        let defaults = config::Config::try_from(&Config::default())?;

        let layered = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("stocktrack").required(false))
            .add_source(
                config::Environment::with_prefix("STOCKTRACK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = layered.try_deserialize()?;
        // environment overrides
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Apply environment variable overrides for sensitive fields
    fn apply_env_overrides(&mut self) {
        use std::env;
        if let Ok(v) = env::var("ALPHAVANTAGE_API_KEY") {
            if !v.trim().is_empty() {
                self.api.api_key = Some(v);
            }
        }
    }
}

impl TimeoutConfig {
    pub fn search(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }

    pub fn overview(&self) -> Duration {
        Duration::from_millis(self.overview_ms)
    }

    pub fn top_movers(&self) -> Duration {
        Duration::from_millis(self.top_movers_ms)
    }

    pub fn time_series(&self) -> Duration {
        Duration::from_millis(self.time_series_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: None,
                max_requests_per_minute: 5,
                timeouts: TimeoutConfig::default(),
            },
            retry: RetryConfig {
                max_retries: 3,
                base_delay_ms: 1_000,
                max_delay_ms: 30_000,
                jitter_ms: 0,
            },
            storage: StorageConfig {
                path: ".stocktrack".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        TimeoutConfig {
            search_ms: 8_000,
            overview_ms: 10_000,
            top_movers_ms: 10_000,
            time_series_ms: 15_000,
        }
    }
}
