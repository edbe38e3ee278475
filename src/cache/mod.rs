//! 결과 캐시
//!
//! 영속 저장소 위에 키 + 만료 시간 기반 메모이제이션을 제공한다.
//! TTL 은 엔트리에 저장하지 않고 읽는 쪽이 매번 넘긴다.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StockError;
use crate::storage::PersistentStore;
use crate::utils::logging;
use crate::utils::{Clock, SystemClock};

/// 저장소에 기록되는 캐시 엔트리
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry<T> {
    pub key: String,
    pub payload: T,
    pub stored_at: i64,
}

impl<T> CacheEntry<T> {
    /// An entry is fresh while its age is strictly below `ttl`.
    /// A `stored_at` in the future (clock skew) counts as stale.
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let age = now_ms.saturating_sub(self.stored_at);
        (0..ttl_ms).contains(&age)
    }
}

#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn PersistentStore>, clock: Arc<dyn Clock>) -> Self {
        ResultCache { store, clock }
    }

    /// 캐시 조회. 없음/디코딩 실패/만료는 모두 None (오류로 올리지 않음).
    pub async fn read<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                logging::log_cache_miss(key);
                return None;
            }
            Err(e) => {
                log::warn!("캐시 읽기 실패 - 키: {} - {}", key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("캐시 엔트리 디코딩 실패 - 키: {} - {}", key, e);
                return None;
            }
        };

        if entry.is_fresh(self.clock.now_ms(), ttl) {
            logging::log_cache_hit(key);
            Some(entry.payload)
        } else {
            log::debug!("캐시 만료: {}", key);
            None
        }
    }

    /// 캐시 기록. 실패는 로그만 남긴다.
    pub async fn write<T: Serialize>(&self, key: &str, value: &T) {
        let entry = CacheEntry {
            key: key.to_string(),
            payload: value,
            stored_at: self.clock.now_ms(),
        };

        let result = match serde_json::to_string(&entry) {
            Ok(json) => self.store.set(key, &json).await,
            Err(e) => Err(StockError::from(e)),
        };
        if let Err(e) = result {
            logging::log_persist_failure(key, &e);
        }
    }

    /// 캐시 엔트리 삭제 (best-effort)
    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            logging::log_persist_failure(key, &e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::utils::ManualClock;
    use async_trait::async_trait;

    const TTL: Duration = Duration::from_secs(60);

    fn setup() -> (Arc<MemoryStore>, Arc<ManualClock>, ResultCache) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache = ResultCache::with_clock(store.clone(), clock.clone());
        (store, clock, cache)
    }

    #[tokio::test]
    async fn test_read_before_and_at_ttl_boundary() {
        let (_, clock, cache) = setup();
        cache.write("top_movers:gainers", &vec!["AAPL".to_string()]).await;

        clock.advance_ms(59_999);
        let hit: Option<Vec<String>> = cache.read("top_movers:gainers", TTL).await;
        assert_eq!(hit, Some(vec!["AAPL".to_string()]));

        clock.advance_ms(1);
        let miss: Option<Vec<String>> = cache.read("top_movers:gainers", TTL).await;
        assert_eq!(miss, None);
    }

    #[tokio::test]
    async fn test_same_entry_under_different_ttl() {
        let (_, clock, cache) = setup();
        cache.write("overview:IBM", &42u32).await;
        clock.advance_ms(10 * 60 * 1000);

        assert_eq!(cache.read::<u32>("overview:IBM", Duration::from_secs(5 * 60)).await, None);
        assert_eq!(cache.read::<u32>("overview:IBM", Duration::from_secs(24 * 3600)).await, Some(42));
    }

    #[tokio::test]
    async fn test_entry_from_the_future_is_stale() {
        let (_, clock, cache) = setup();
        cache.write("overview:IBM", &7u32).await;
        clock.advance_ms(-5_000);
        assert_eq!(cache.read::<u32>("overview:IBM", Duration::from_secs(24 * 3600)).await, None);

        let entry = CacheEntry { key: "k".to_string(), payload: (), stored_at: 1_000 };
        assert!(entry.is_fresh(1_000, TTL));
        assert!(!entry.is_fresh(999, TTL));
    }

    #[tokio::test]
    async fn test_write_replaces_and_refreshes_timestamp() {
        let (_, clock, cache) = setup();
        cache.write("k", &1u32).await;
        clock.advance_ms(50_000);
        cache.write("k", &2u32).await;
        clock.advance_ms(50_000);
        assert_eq!(cache.read::<u32>("k", TTL).await, Some(2));
    }

    #[tokio::test]
    async fn test_corrupt_or_mismatched_entry_is_a_miss() {
        let (store, _, cache) = setup();
        store.set("k", "not json").await.unwrap();
        assert_eq!(cache.read::<u32>("k", TTL).await, None);

        cache.write("k", &"text").await;
        assert_eq!(cache.read::<u32>("k", TTL).await, None);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (store, _, cache) = setup();
        cache.write("k", &1u32).await;
        cache.invalidate("k").await;
        assert!(store.is_empty().await);
        assert_eq!(cache.read::<u32>("k", TTL).await, None);
    }

    struct BrokenStore;

    #[async_trait]
    impl PersistentStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StockError> {
            Err(StockError::Storage("disk gone".into()))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StockError> {
            Err(StockError::Storage("disk gone".into()))
        }
        async fn remove(&self, _key: &str) -> Result<(), StockError> {
            Err(StockError::Storage("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn test_store_failures_are_swallowed() {
        let cache = ResultCache::new(Arc::new(BrokenStore));
        cache.write("k", &1u32).await;
        cache.invalidate("k").await;
        assert_eq!(cache.read::<u32>("k", TTL).await, None);
    }
}
