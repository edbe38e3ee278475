use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::StockError;
use crate::market_data::provider::{ApiRequest, MarketDataProvider};

/// 미리 정해 둔 응답을 순서대로 돌려주는 제공자 (테스트/오프라인용)
///
/// 큐가 비면 `Network` 오류를 반환한다.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<Value, StockError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_ok(mut self, payload: Value) -> Self {
        self.responses.get_mut().push_back(Ok(payload));
        self
    }

    pub fn respond_err(mut self, error: StockError) -> Self {
        self.responses.get_mut().push_back(Err(error));
        self
    }

    /// 지금까지 받은 요청 수
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl MarketDataProvider for ScriptedProvider {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, StockError> {
        self.requests.lock().await.push(request.clone());
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(StockError::Network("no scripted response left".to_string())))
    }
}
