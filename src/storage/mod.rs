//! 영속 키-값 저장소
//!
//! 워치리스트와 결과 캐시가 공유하는 비동기 문자열 저장소 인터페이스와 구현체.

mod file;

pub use file::FileStore;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StockError;

/// 영속 저장소 인터페이스
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// 키로 값 조회 (없으면 None)
    async fn get(&self, key: &str) -> Result<Option<String>, StockError>;

    /// 값 저장 (기존 값 덮어쓰기)
    async fn set(&self, key: &str, value: &str) -> Result<(), StockError>;

    /// 키 삭제 (없어도 성공)
    async fn remove(&self, key: &str) -> Result<(), StockError>;
}

/// 메모리 기반 저장소 구현
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 저장된 키 개수
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StockError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StockError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StockError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
