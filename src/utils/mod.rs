//! 시간 관련 유틸리티
//!
//! 시간 변환, 포맷팅, 시계 추상화 제공

pub mod coercion;
pub mod logging;

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// 밀리초 단위 현재 시각 제공자
pub trait Clock: Send + Sync {
  fn now_ms(&self) -> i64;
}

/// 시스템 시계
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_ms(&self) -> i64 {
    current_timestamp_ms()
  }
}

/// 수동으로 진행시키는 시계 (캐시 만료 테스트용)
#[derive(Debug, Default)]
pub struct ManualClock {
  now: AtomicI64,
}

impl ManualClock {
  pub fn new(start_ms: i64) -> Self {
    Self { now: AtomicI64::new(start_ms) }
  }

  pub fn advance_ms(&self, delta: i64) {
    self.now.fetch_add(delta, Ordering::SeqCst);
  }

  pub fn set_ms(&self, value: i64) {
    self.now.store(value, Ordering::SeqCst);
  }
}

impl Clock for ManualClock {
  fn now_ms(&self) -> i64 {
    self.now.load(Ordering::SeqCst)
  }
}

/// 타임스탬프(밀리초)를 DateTime<Utc>로 변환
pub fn timestamp_to_datetime(timestamp_ms: i64) -> Option<DateTime<Utc>> {
  Utc.timestamp_millis_opt(timestamp_ms).single()
}

/// 현재 시간을 타임스탬프(밀리초)로 반환
pub fn current_timestamp_ms() -> i64 {
  Utc::now().timestamp_millis()
}

/// 타임스탬프(밀리초)를 포맷팅된 문자열로 변환
pub fn format_timestamp(timestamp_ms: i64, format: &str) -> String {
  timestamp_to_datetime(timestamp_ms)
    .map(|dt| dt.format(format).to_string())
    .unwrap_or_default()
}

/// 일 단위를 밀리초로 변환
pub fn days_to_ms(days: i64) -> i64 {
  days * 24 * 60 * 60 * 1000
}
