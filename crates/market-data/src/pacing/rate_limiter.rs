//! Token bucket pacing for a per-minute request budget.
//!
//! Allows short bursts up to the bucket capacity, then settles into the
//! configured steady rate.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};

use super::pacer::Pacer;

/// Default rate limit: 60 requests per minute.
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Default bucket capacity (allows bursting).
const DEFAULT_BUCKET_CAPACITY: f64 = 10.0;

#[derive(Debug)]
struct TokenBucket {
    /// Current number of available tokens.
    tokens: f64,
    /// Last time the bucket was updated.
    last_update: Instant,
    /// Token refill rate (tokens per second).
    rate: f64,
    /// Maximum bucket capacity.
    capacity: f64,
}

impl TokenBucket {
    fn with_config(config: &RateLimitConfig) -> Self {
        let capacity = config.burst_capacity.max(1.0);
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: config.requests_per_minute.max(1) as f64 / 60.0,
            capacity,
        }
    }

    /// Refill tokens based on elapsed time.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    /// Try to take a token immediately.
    fn try_acquire(&mut self) -> bool {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Wait time until a token becomes available.
    fn time_until_available(&mut self) -> Duration {
        self.refill();

        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.rate)
        }
    }
}

/// Budget for a [`TokenBucketPacer`].
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum requests per minute.
    pub requests_per_minute: u32,
    /// Maximum burst capacity.
    pub burst_capacity: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            burst_capacity: DEFAULT_BUCKET_CAPACITY,
        }
    }
}

/// Pacer backed by a single token bucket.
pub struct TokenBucketPacer {
    bucket: Mutex<TokenBucket>,
}

impl TokenBucketPacer {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            bucket: Mutex::new(TokenBucket::with_config(&config)),
        }
    }

    /// Lock the bucket, recovering from poison.
    fn lock_bucket(&self) -> MutexGuard<'_, TokenBucket> {
        self.bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Token bucket mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Take a token without waiting. Returns false when the budget is spent.
    pub fn try_acquire(&self) -> bool {
        self.lock_bucket().try_acquire()
    }

    /// Tokens currently available.
    pub fn remaining_tokens(&self) -> f64 {
        let mut bucket = self.lock_bucket();
        bucket.refill();
        bucket.tokens
    }
}

impl Default for TokenBucketPacer {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[async_trait]
impl Pacer for TokenBucketPacer {
    async fn wait(&self) {
        loop {
            let wait_time = {
                let mut bucket = self.lock_bucket();
                if bucket.try_acquire() {
                    return;
                }
                bucket.time_until_available()
            };

            if wait_time > Duration::ZERO {
                debug!("Token bucket: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bucket_acquire() {
        let mut bucket = TokenBucket::with_config(&RateLimitConfig::default());

        for _ in 0..DEFAULT_BUCKET_CAPACITY as usize {
            assert!(bucket.try_acquire());
        }

        assert!(!bucket.try_acquire());
    }

    #[test]
    fn test_token_bucket_refill() {
        let mut bucket = TokenBucket::with_config(&RateLimitConfig {
            requests_per_minute: 60,
            burst_capacity: 1.0,
        });

        assert!(bucket.try_acquire());
        assert!(!bucket.try_acquire());

        // Simulate two seconds passing
        bucket.last_update = Instant::now() - Duration::from_secs(2);

        assert!(bucket.try_acquire());
    }

    #[test]
    fn test_pacer_respects_custom_burst() {
        let pacer = TokenBucketPacer::new(RateLimitConfig {
            requests_per_minute: 120,
            burst_capacity: 5.0,
        });

        for _ in 0..5 {
            assert!(pacer.try_acquire());
        }
        assert!(!pacer.try_acquire());
    }

    #[test]
    fn test_remaining_tokens() {
        let pacer = TokenBucketPacer::default();

        let initial = pacer.remaining_tokens();
        assert!((initial - DEFAULT_BUCKET_CAPACITY).abs() < 0.01);

        pacer.try_acquire();
        pacer.try_acquire();

        let remaining = pacer.remaining_tokens();
        assert!((remaining - (DEFAULT_BUCKET_CAPACITY - 2.0)).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_wait_blocks_once_burst_is_spent() {
        let pacer = TokenBucketPacer::new(RateLimitConfig {
            requests_per_minute: 6000, // 100/second for a fast test
            burst_capacity: 2.0,
        });

        pacer.wait().await;
        pacer.wait().await;

        let start = Instant::now();
        pacer.wait().await;

        // ~10ms at 100 req/sec
        assert!(start.elapsed().as_millis() >= 5);
    }
}
