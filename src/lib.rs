//! 주식 추적 라이브러리
//!
//! 시세 API 에서 개요/시계열/상승·하락 종목/심볼 검색을 가져와 캐시하고,
//! 시계열을 차트용으로 정규화하며, 워치리스트를 로컬 저장소에 유지합니다.

pub mod cache;
pub mod config;
pub mod error;
pub mod market_data;
pub mod models;
pub mod series;
pub mod storage;
pub mod utils;
pub mod watchlist;

// 핵심 타입 재노출
pub use crate::cache::ResultCache;
pub use crate::config::Config;
pub use crate::error::StockError;
pub use crate::market_data::{HttpProvider, MarketDataClient, MarketDataProvider, RetryPolicy};
pub use crate::models::{
    MoverDirection, NormalizedSeries, OverviewRecord, Period, StockSummary, SymbolMatch,
    TimeSeriesPoint, Watchlist, WatchlistId,
};
pub use crate::storage::{FileStore, MemoryStore, PersistentStore};
pub use crate::watchlist::WatchlistStore;

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, StockError>;
