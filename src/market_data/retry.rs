use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;
use crate::error::StockError;
use crate::utils::logging;

/// 모든 엔드포인트에 공통으로 적용하는 재시도 정책
///
/// 재시도 n 번째(0부터)의 대기 시간은 `min(base * 2^n, max) + jitter`.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    jitter: Duration,
    classifier: fn(&StockError) -> bool,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        RetryPolicy {
            max_retries,
            base_delay,
            max_delay,
            jitter: Duration::ZERO,
            classifier: StockError::is_retryable,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
        .with_jitter(Duration::from_millis(config.jitter_ms))
    }

    /// 재시도 없음
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_classifier(mut self, classifier: fn(&StockError) -> bool) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn is_retryable(&self, error: &StockError) -> bool {
        (self.classifier)(error)
    }

    /// Backoff before retry number `retry` (0-based), without jitter.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn jitter_sample(&self) -> Duration {
        let max_ms = self.jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }

    /// `op` 을 실행하고, 재시도 가능한 오류면 백오프 후 최대 `max_retries` 번 다시 실행
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, StockError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StockError>>,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if retry < self.max_retries && self.is_retryable(&e) => {
                    let delay = self.delay_for(retry) + self.jitter_sample();
                    retry += 1;
                    logging::log_retry(label, retry, self.max_retries, delay, &e);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_secs(1), Duration::from_secs(30))
    }
}
