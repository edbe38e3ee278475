/**
* filename : client
* author : HAMA
* date: 2025. 5. 13.
* description: 시장 데이터 클라이언트 (캐시 -> 재시도 -> 제공자)
**/

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::ResultCache;
use crate::config::{Config, TimeoutConfig};
use crate::error::StockError;
use crate::market_data::provider::{inspect_payload, ApiRequest, MarketDataProvider};
use crate::market_data::retry::RetryPolicy;
use crate::models::{
    MoverDirection, NormalizedSeries, OverviewRecord, Period, RawBar, RawSeries, StockSummary,
    SymbolMatch,
};
use crate::series;
use crate::storage::PersistentStore;

pub const OVERVIEW_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const TOP_MOVERS_TTL: Duration = Duration::from_secs(60 * 60);
pub const SEARCH_TTL: Duration = Duration::from_secs(5 * 60);

/// 개요, 시계열, 상승/하락 종목, 심볼 검색을 제공하는 클라이언트
///
/// 모든 호출은 캐시를 먼저 확인하고, 미스일 때만 재시도 정책 아래에서 제공자를 호출한다.
/// 실패한 응답은 캐시하지 않는다.
#[derive(Clone)]
pub struct MarketDataClient {
    provider: Arc<dyn MarketDataProvider>,
    cache: ResultCache,
    retry: RetryPolicy,
    timeouts: TimeoutConfig,
}

impl MarketDataClient {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: ResultCache,
        retry: RetryPolicy,
        timeouts: TimeoutConfig,
    ) -> Self {
        MarketDataClient {
            provider,
            cache,
            retry,
            timeouts,
        }
    }

    pub fn from_config(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn PersistentStore>,
        config: &Config,
    ) -> Self {
        Self::new(
            provider,
            ResultCache::new(store),
            RetryPolicy::from_config(&config.retry),
            config.api.timeouts.clone(),
        )
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// 회사 개요 조회 (24시간 캐시)
    pub async fn fetch_overview(&self, ticker: &str) -> Result<OverviewRecord, StockError> {
        let ticker = normalize_ticker(ticker)?;
        let key = format!("overview:{}", ticker);
        if let Some(hit) = self.cache.read::<OverviewRecord>(&key, OVERVIEW_TTL).await {
            return Ok(hit);
        }

        let request = ApiRequest::new("OVERVIEW", self.timeouts.overview()).param("symbol", &ticker);
        let payload = self.request("overview", &request).await?;

        if payload.as_object().map_or(true, |o| o.is_empty()) {
            return Err(StockError::EmptyResult(format!("overview for {}", ticker)));
        }
        let record: OverviewRecord = serde_json::from_value(payload)
            .map_err(|e| StockError::MalformedPayload(format!("overview: {}", e)))?;
        if record.symbol.trim().is_empty() {
            return Err(StockError::EmptyResult(format!("overview for {}", ticker)));
        }

        self.cache.write(&key, &record).await;
        Ok(record)
    }

    /// 기간별 시계열 조회. 원시 응답만 캐시하고 정규화는 매번 다시 한다.
    pub async fn fetch_time_series(
        &self,
        ticker: &str,
        period: Period,
    ) -> Result<NormalizedSeries, StockError> {
        let ticker = normalize_ticker(ticker)?;
        let key = format!("timeseries:{}:{}", ticker, period);

        let raw = match self.cache.read::<RawSeries>(&key, period.freshness()).await {
            Some(raw) => raw,
            None => {
                let raw = self.download_series(&ticker, period).await?;
                self.cache.write(&key, &raw).await;
                raw
            }
        };

        Ok(series::normalize_recent(&raw, period))
    }

    async fn download_series(&self, ticker: &str, period: Period) -> Result<RawSeries, StockError> {
        let resolution = period.resolution();
        let mut request = ApiRequest::new(resolution.function(), self.timeouts.time_series())
            .param("symbol", ticker);
        if let Some(interval) = resolution.interval() {
            request = request.param("interval", interval);
        }
        if let Some(size) = period.output_size() {
            request = request.param("outputsize", size.as_str());
        }

        let payload = self.request("time_series", &request).await?;
        extract_series(&payload)
            .ok_or_else(|| StockError::EmptyResult(format!("time series for {} ({})", ticker, period)))
    }

    /// 상승/하락/거래량 상위 종목 (1시간 캐시)
    ///
    /// 한 번의 업스트림 호출로 세 방향의 캐시를 모두 채운다.
    pub async fn fetch_top_movers(
        &self,
        direction: MoverDirection,
    ) -> Result<Vec<StockSummary>, StockError> {
        if let Some(hit) = self
            .cache
            .read::<Vec<StockSummary>>(&movers_key(direction), TOP_MOVERS_TTL)
            .await
        {
            return Ok(hit);
        }

        let request = ApiRequest::new("TOP_GAINERS_LOSERS", self.timeouts.top_movers());
        let payload = self.request("top_movers", &request).await?;

        let mut requested = None;
        for dir in MoverDirection::ALL {
            let rows = match payload.get(dir.payload_key()).and_then(Value::as_array) {
                Some(rows) => rows,
                None => continue,
            };
            let list: Vec<StockSummary> = rows.iter().filter_map(StockSummary::from_value).collect();
            self.cache.write(&movers_key(dir), &list).await;
            if dir == direction {
                requested = Some(list);
            }
        }

        requested.ok_or_else(|| StockError::EmptyResult(format!("top movers ({})", direction)))
    }

    /// 심볼 검색 (5분 캐시). 빈 검색어는 호출 없이 빈 결과.
    pub async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>, StockError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let key = format!("search:{}", query);
        if let Some(hit) = self.cache.read::<Vec<SymbolMatch>>(&key, SEARCH_TTL).await {
            return Ok(hit);
        }

        let request = ApiRequest::new("SYMBOL_SEARCH", self.timeouts.search()).param("keywords", query);
        let payload = self.request("search", &request).await?;
        let matches: Vec<SymbolMatch> = payload
            .get("bestMatches")
            .and_then(Value::as_array)
            .ok_or_else(|| StockError::MalformedPayload("search: bestMatches missing".to_string()))?
            .iter()
            .filter_map(|row| serde_json::from_value(row.clone()).ok())
            .collect();

        self.cache.write(&key, &matches).await;
        Ok(matches)
    }

    /// 제공자 호출 + 본문 오류 검사를 재시도 정책으로 감싼다
    async fn request(&self, label: &str, request: &ApiRequest) -> Result<Value, StockError> {
        let provider = &self.provider;
        let result = self
            .retry
            .run(label, move || async move {
                provider.fetch(request).await.and_then(inspect_payload)
            })
            .await;

        if let Err(e) = &result {
            log::error!("{} 요청 실패 ({:?}): {}", label, request.get("symbol"), e);
        }
        result
    }
}

fn movers_key(direction: MoverDirection) -> String {
    format!("top_movers:{}", direction)
}

/// 티커 정리: 앞뒤 공백 제거 + 대문자
pub fn normalize_ticker(ticker: &str) -> Result<String, StockError> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(StockError::InvalidParameter("ticker must not be blank".to_string()));
    }
    Ok(ticker.to_uppercase())
}

/// "Time Series" 가 들어간 키 아래의 날짜 -> 바 매핑. 형식이 맞지 않는 행은 건너뛴다.
fn extract_series(payload: &Value) -> Option<RawSeries> {
    let rows = payload
        .as_object()?
        .iter()
        .find(|(key, value)| key.contains("Time Series") && value.is_object())
        .and_then(|(_, value)| value.as_object())?;

    Some(
        rows.iter()
            .filter_map(|(date, bar)| {
                serde_json::from_value::<RawBar>(bar.clone())
                    .ok()
                    .map(|bar| (date.clone(), bar))
            })
            .collect(),
    )
}
