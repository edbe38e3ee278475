use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::error::StockError;

/// 업스트림 API 요청 한 건 (function + 쿼리 파라미터 + 타임아웃)
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub function: String,
    pub params: Vec<(String, String)>,
    pub timeout: Duration,
}

impl ApiRequest {
    pub fn new(function: impl Into<String>, timeout: Duration) -> Self {
        ApiRequest {
            function: function.into(),
            params: Vec::new(),
            timeout,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `function` first, then the remaining parameters in insertion order.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        std::iter::once(("function", self.function.as_str()))
            .chain(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }
}

/// 시장 데이터 제공자 인터페이스
///
/// 전송 계층 오류(타임아웃, HTTP 상태)만 분류해서 돌려준다.
/// 200 응답 본문 안의 오류 표기는 클라이언트가 검사한다.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 요청을 보내고 JSON 본문을 반환
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, StockError>;
}

/// 200 응답 본문에 담긴 오류 표기 검사
pub fn inspect_payload(payload: Value) -> Result<Value, StockError> {
    if let Some(msg) = payload.get("Error Message").and_then(Value::as_str) {
        return Err(StockError::UpstreamMessage(msg.to_string()));
    }
    for key in ["Note", "Information"] {
        if let Some(msg) = payload.get(key).and_then(Value::as_str) {
            return Err(StockError::RateLimitNotice(msg.to_string()));
        }
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_order() {
        let req = ApiRequest::new("TIME_SERIES_INTRADAY", Duration::from_secs(15))
            .param("symbol", "IBM")
            .param("interval", "5min");
        assert_eq!(
            req.query_pairs(),
            vec![
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", "IBM"),
                ("interval", "5min")
            ]
        );
        assert_eq!(req.get("symbol"), Some("IBM"));
        assert_eq!(req.get("outputsize"), None);
    }

    #[test]
    fn test_inspect_payload() {
        assert!(matches!(
            inspect_payload(json!({"Error Message": "Invalid API call"})),
            Err(StockError::UpstreamMessage(m)) if m == "Invalid API call"
        ));
        assert!(matches!(
            inspect_payload(json!({"Note": "Thank you for using Alpha Vantage! 5 calls per minute"})),
            Err(StockError::RateLimitNotice(_))
        ));
        assert!(matches!(
            inspect_payload(json!({"Information": "daily limit reached"})),
            Err(StockError::RateLimitNotice(_))
        ));
        assert!(inspect_payload(json!({"Symbol": "IBM"})).is_ok());
        assert!(inspect_payload(json!({})).is_ok());
    }
}
