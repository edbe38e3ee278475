/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description: 크레이트 공통 오류 타입
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("Request timed out")]
    Timeout,

    #[error("Too many requests (HTTP 429)")]
    TooManyRequests,

    #[error("Server error: HTTP {0}")]
    ServerError(u16),

    #[error("Client error: HTTP {0}")]
    ClientError(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream error: {0}")]
    UpstreamMessage(String),

    #[error("Rate limit notice: {0}")]
    RateLimitNotice(String),

    #[error("No data found: {0}")]
    EmptyResult(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Watchlist name already in use: {0}")]
    DuplicateName(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl StockError {
    /// 재시도 가능한 일시적 오류인지 여부 (타임아웃, 429, 5xx, 연결 실패)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StockError::Timeout
                | StockError::TooManyRequests
                | StockError::ServerError(_)
                | StockError::Network(_)
        )
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => StockError::TooManyRequests,
            500..=599 => StockError::ServerError(status),
            _ => StockError::ClientError(status),
        }
    }
}

impl From<config::ConfigError> for StockError {
    fn from(err: config::ConfigError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}
