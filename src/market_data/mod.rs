//! 시장 데이터 모듈
//!
//! 업스트림 제공자 인터페이스, HTTP 구현, 재시도 정책, 요청 한도 보호, 그리고 캐시를 앞에 둔 클라이언트.

pub mod client;
pub mod http;
pub mod mock;
pub mod provider;
pub mod rate_limit;
pub mod retry;

pub use client::{normalize_ticker, MarketDataClient, OVERVIEW_TTL, SEARCH_TTL, TOP_MOVERS_TTL};
pub use http::HttpProvider;
pub use mock::ScriptedProvider;
pub use provider::{inspect_payload, ApiRequest, MarketDataProvider};
pub use rate_limit::RateLimiter;
pub use retry::RetryPolicy;
