use std::time::Instant;

use crate::error::StockError;

/// Token bucket guarding the provider's per-minute request budget.
pub struct RateLimiter {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(max_per_minute: u32) -> Self {
        let capacity = max_per_minute.max(1) as f64;
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec: capacity / 60.0,
            last_refill: Instant::now(),
        }
    }

    /// 토큰 하나 소비. 부족하면 429 와 같은 재시도 가능 오류.
    pub fn try_acquire(&mut self) -> Result<(), StockError> {
        self.refill();
        if self.tokens < 1.0 {
            return Err(StockError::TooManyRequests);
        }
        self.tokens -= 1.0;
        Ok(())
    }

    pub fn available(&mut self) -> u32 {
        self.refill();
        self.tokens.floor() as u32
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_when_exhausted() {
        let mut limiter = RateLimiter::new(2);
        assert_eq!(limiter.available(), 2);
        limiter.try_acquire().unwrap();
        limiter.try_acquire().unwrap();
        let err = limiter.try_acquire().unwrap_err();
        assert!(matches!(err, StockError::TooManyRequests));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_zero_budget_still_allows_one() {
        let mut limiter = RateLimiter::new(0);
        assert!(limiter.try_acquire().is_ok());
    }
}
