//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use std::env;
use std::time::Duration;

use env_logger::Builder;
use log::LevelFilter;

use crate::config::LoggingConfig;
use crate::error::StockError;

/// 로깅 시스템 초기화 (RUST_LOG 가 설정 파일 레벨보다 우선)
pub fn init(config: &LoggingConfig) -> Result<(), StockError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    builder
        .filter_level(parse_level(&log_level))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| StockError::ConfigError(format!("logger already initialised: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 로그 레벨 파싱
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 캐시 적중 로그
pub fn log_cache_hit(key: &str) {
    log::debug!("캐시 적중: {}", key);
}

/// 캐시 미스 로그
pub fn log_cache_miss(key: &str) {
    log::debug!("캐시 미스: {}", key);
}

/// 재시도 예약 로그
pub fn log_retry(label: &str, retry: u32, max_retries: u32, delay: Duration, error: &StockError) {
    log::warn!(
        "재시도 {}/{} - {} - {}ms 후 재요청 - 원인: {}",
        retry, max_retries, label, delay.as_millis(), error
    );
}

/// 저장소 쓰기 실패 로그
pub fn log_persist_failure(key: &str, error: &StockError) {
    log::error!("저장 실패 - 키: {} - {}", key, error);
}

/// 오류 로그
pub fn log_error(context: &str, error: &StockError) {
    log::error!("오류 발생 - {}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }
}
