//! 시장 데이터 클라이언트 통합 테스트
//!
//! 스크립트 제공자 + 메모리 저장소로 캐시/재시도/정규화 흐름 전체를 검증

use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use serde_json::{json, Map, Value};
use stocktrack::cache::ResultCache;
use stocktrack::config::TimeoutConfig;
use stocktrack::market_data::{MarketDataClient, RetryPolicy, ScriptedProvider};
use stocktrack::models::{MoverDirection, Period};
use stocktrack::storage::{MemoryStore, PersistentStore};
use stocktrack::utils::ManualClock;
use stocktrack::StockError;

const NOW_MS: i64 = 1_709_600_000_000;

struct Harness {
  provider: Arc<ScriptedProvider>,
  store: Arc<MemoryStore>,
  clock: Arc<ManualClock>,
  client: MarketDataClient,
}

fn harness(provider: ScriptedProvider) -> Harness {
  let provider = Arc::new(provider);
  let store = Arc::new(MemoryStore::new());
  let clock = Arc::new(ManualClock::new(NOW_MS));
  let cache = ResultCache::with_clock(store.clone(), clock.clone());
  let client = MarketDataClient::new(
    provider.clone(),
    cache,
    RetryPolicy::new(3, Duration::ZERO, Duration::ZERO),
    TimeoutConfig::default(),
  );
  Harness { provider, store, clock, client }
}

/// 2024-02-01 부터 22일치 일봉, 종가 100 -> 115
fn acme_daily_payload() -> Value {
  let start = chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
  let mut rows = Map::new();
  for i in 0..22 {
    let date = start + chrono::Duration::days(i);
    let close = 100.0 + 15.0 * i as f64 / 21.0;
    rows.insert(
      date.format("%Y-%m-%d").to_string(),
      json!({
        "1. open": format!("{:.4}", close - 0.5),
        "2. high": format!("{:.4}", close + 1.0),
        "3. low": format!("{:.4}", close - 1.0),
        "4. close": format!("{:.4}", close),
        "5. volume": "1200000"
      }),
    );
  }
  json!({
    "Meta Data": {"2. Symbol": "ACME"},
    "Time Series (Daily)": rows
  })
}

#[tokio::test]
async fn test_acme_one_month_series() {
  let h = harness(ScriptedProvider::new().respond_ok(acme_daily_payload()));

  let series = h.client.fetch_time_series("ACME", Period::OneMonth).await.unwrap();
  assert_eq!(series.sampled_points.len(), 22);
  assert!((series.price_change_percent - 15.0).abs() < 0.1);
  assert_eq!(series.labels.len(), 22);
  assert_eq!(series.labels.iter().filter(|l| !l.is_empty()).count(), 6);

  // 요청 형태 확인
  let requests = h.provider.requests().await;
  assert_eq!(requests[0].function, "TIME_SERIES_DAILY");
  assert_eq!(requests[0].get("symbol"), Some("ACME"));
  assert_eq!(requests[0].get("outputsize"), Some("compact"));
}

/// 금요일 2024-02-02 부터 평일만 22 개 (2024-03-04 까지 31 일), 종가 100 -> 115
fn acme_trading_day_payload() -> Value {
  let mut date = chrono::NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
  let mut rows = Map::new();
  let mut i = 0;
  while i < 22 {
    if date.weekday().number_from_monday() <= 5 {
      let close = 100.0 + 15.0 * i as f64 / 21.0;
      rows.insert(
        date.format("%Y-%m-%d").to_string(),
        json!({"1. open": "100", "2. high": "116", "3. low": "99", "4. close": format!("{:.4}", close), "5. volume": "1000"}),
      );
      i += 1;
    }
    date += chrono::Duration::days(1);
  }
  json!({"Time Series (Daily)": rows})
}

#[tokio::test]
async fn test_one_month_of_trading_days_keeps_first_session() {
  let h = harness(ScriptedProvider::new().respond_ok(acme_trading_day_payload()));

  let series = h.client.fetch_time_series("ACME", Period::OneMonth).await.unwrap();
  assert_eq!(series.sampled_points.len(), 22);
  assert_eq!(series.sampled_points[0].close, 100.0);
  assert!((series.price_change_percent - 15.0).abs() < 0.1);
}

#[tokio::test]
async fn test_series_served_from_cache_until_stale() {
  let h = harness(
    ScriptedProvider::new()
      .respond_ok(acme_daily_payload())
      .respond_ok(acme_daily_payload()),
  );

  let first = h.client.fetch_time_series("acme", Period::OneMonth).await.unwrap();
  let second = h.client.fetch_time_series("ACME", Period::OneMonth).await.unwrap();
  assert_eq!(first, second);
  assert_eq!(h.provider.call_count().await, 1);
  assert!(h.store.get("timeseries:ACME:1M").await.unwrap().is_some());

  // 1M 은 30분 신선도
  h.clock.advance_ms(30 * 60 * 1000);
  h.client.fetch_time_series("ACME", Period::OneMonth).await.unwrap();
  assert_eq!(h.provider.call_count().await, 2);
}

#[tokio::test]
async fn test_empty_overview_not_retried_or_cached() {
  let h = harness(ScriptedProvider::new().respond_ok(json!({})));

  let err = h.client.fetch_overview("ZZZZ").await.unwrap_err();
  assert!(matches!(err, StockError::EmptyResult(_)));
  assert!(!err.is_retryable());
  assert_eq!(h.provider.call_count().await, 1);
  assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_top_movers_cached_for_an_hour() {
  let payload = json!({
    "metadata": "Top gainers, losers, and most actively traded US tickers",
    "top_gainers": [
      {"ticker": "ACME", "price": "12.5", "change_amount": "2.5", "change_percentage": "25.0%", "volume": "900000"},
      {"ticker": "BETA", "price": "3.1", "change_amount": "0.6", "change_percentage": "24.0%", "volume": "120000"}
    ],
    "top_losers": [],
    "most_actively_traded": []
  });
  let h = harness(
    ScriptedProvider::new()
      .respond_ok(payload.clone())
      .respond_ok(payload),
  );

  let first = h.client.fetch_top_movers(MoverDirection::Gainers).await.unwrap();
  h.clock.advance_ms(59 * 60 * 1000);
  let second = h.client.fetch_top_movers(MoverDirection::Gainers).await.unwrap();
  assert_eq!(first, second);
  assert_eq!(first.iter().map(|s| s.ticker.as_str()).collect::<Vec<_>>(), vec!["ACME", "BETA"]);
  assert_eq!(h.provider.call_count().await, 1);

  // 같은 호출로 채워진 다른 방향도 캐시에서
  assert!(h.client.fetch_top_movers(MoverDirection::Losers).await.unwrap().is_empty());
  assert_eq!(h.provider.call_count().await, 1);

  h.clock.advance_ms(60 * 1000);
  h.client.fetch_top_movers(MoverDirection::Gainers).await.unwrap();
  assert_eq!(h.provider.call_count().await, 2);
}

#[tokio::test]
async fn test_blank_search_makes_no_request() {
  let h = harness(ScriptedProvider::new());
  assert!(h.client.search_symbols("  \t ").await.unwrap().is_empty());
  assert_eq!(h.provider.call_count().await, 0);
}

#[tokio::test]
async fn test_transient_errors_retried_then_succeed() {
  let h = harness(
    ScriptedProvider::new()
      .respond_err(StockError::Timeout)
      .respond_err(StockError::TooManyRequests)
      .respond_err(StockError::ServerError(503))
      .respond_ok(json!({"Symbol": "IBM", "Name": "IBM"})),
  );

  let overview = h.client.fetch_overview("IBM").await.unwrap();
  assert_eq!(overview.symbol, "IBM");
  assert_eq!(h.provider.call_count().await, 4);
}

#[tokio::test]
async fn test_server_errors_surface_after_max_retries() {
  let mut provider = ScriptedProvider::new();
  for _ in 0..5 {
    provider = provider.respond_err(StockError::ServerError(500));
  }
  let h = harness(provider);

  let err = h.client.search_symbols("acme").await.unwrap_err();
  assert!(matches!(err, StockError::ServerError(500)));
  assert!(err.is_retryable());
  // 1회 + 재시도 3회
  assert_eq!(h.provider.call_count().await, 4);
}

#[tokio::test]
async fn test_client_errors_and_upstream_messages_not_retried() {
  let h = harness(
    ScriptedProvider::new()
      .respond_err(StockError::ClientError(403))
      .respond_ok(json!({"Error Message": "Invalid API call."})),
  );

  let err = h.client.fetch_overview("IBM").await.unwrap_err();
  assert!(matches!(err, StockError::ClientError(403)));
  assert_eq!(h.provider.call_count().await, 1);

  let err = h.client.fetch_time_series("IBM", Period::OneYear).await.unwrap_err();
  assert!(matches!(err, StockError::UpstreamMessage(_)));
  assert_eq!(h.provider.call_count().await, 2);
  assert!(h.store.is_empty().await);
}
