/**
* filename : http
* author : HAMA
* date: 2025. 5. 13.
* description: reqwest 기반 시장 데이터 제공자
**/

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::ApiConfig;
use crate::error::StockError;
use crate::market_data::provider::{ApiRequest, MarketDataProvider};
use crate::market_data::rate_limit::RateLimiter;

const USER_AGENT: &str = concat!("stocktrack/", env!("CARGO_PKG_VERSION"));

pub struct HttpProvider {
    client: Client,
    base_url: String,
    api_key: String,
    limiter: Option<Mutex<RateLimiter>>,
}

impl HttpProvider {
    /// API 키가 없거나 비어 있으면 설정 오류
    pub fn new(config: &ApiConfig) -> Result<Self, StockError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                StockError::ConfigError(
                    "API key missing (set ALPHAVANTAGE_API_KEY or api.api_key)".to_string(),
                )
            })?
            .to_string();

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StockError::ConfigError(format!("HTTP client init failed: {}", e)))?;

        let limiter = match config.max_requests_per_minute {
            0 => None,
            n => Some(Mutex::new(RateLimiter::new(n))),
        };

        Ok(HttpProvider {
            client,
            base_url: config.base_url.clone(),
            api_key,
            limiter,
        })
    }

    fn map_transport_error(e: reqwest::Error) -> StockError {
        if e.is_timeout() {
            StockError::Timeout
        } else if let Some(status) = e.status() {
            StockError::from_status(status.as_u16())
        } else {
            StockError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl MarketDataProvider for HttpProvider {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, StockError> {
        if let Some(limiter) = &self.limiter {
            limiter.lock().await.try_acquire()?;
        }

        log::debug!("요청: {} {:?}", request.function, request.params);

        let mut query = request.query_pairs();
        query.push(("apikey", self.api_key.as_str()));

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockError::from_status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                StockError::Timeout
            } else {
                StockError::MalformedPayload(e.to_string())
            }
        })
    }
}
