//! Rate limiting for NCBI API compliance
//!
//! NCBI E-utilities allows 3 requests per second without an API key and
//! 10 per second with one; violations can result in IP blocking.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

/// Token bucket rate limiter shared by all requests of a client
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<Mutex<TokenBucket>>,
}

struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a new rate limiter allowing `rate` requests per second
    pub fn new(rate: f64) -> Self {
        let capacity = rate.max(1.0);
        Self {
            bucket: Arc::new(Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                refill_rate: rate,
                last_refill: Instant::now(),
            })),
        }
    }

    /// Rate limiter for NCBI API without API key (3 requests/second)
    pub fn ncbi_default() -> Self {
        Self::new(3.0)
    }

    /// Rate limiter for NCBI API with API key (10 requests/second)
    pub fn ncbi_with_key() -> Self {
        Self::new(10.0)
    }

    /// Acquire a token, sleeping as needed to respect the configured rate
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().expect("rate limiter mutex poisoned");
                refill(&mut bucket);

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    debug!(remaining_tokens = bucket.tokens, "Token acquired");
                    return;
                }

                // Time until one full token has accumulated
                Duration::from_secs_f64((1.0 - bucket.tokens) / bucket.refill_rate)
            };

            debug!(wait_ms = wait.as_millis() as u64, "Waiting for rate limit");
            tokio::time::sleep(wait).await;
        }
    }

    /// Check whether a token is available without consuming one
    pub fn check_available(&self) -> bool {
        let mut bucket = self.bucket.lock().expect("rate limiter mutex poisoned");
        refill(&mut bucket);
        bucket.tokens >= 1.0
    }

    /// Configured rate limit in requests per second
    pub fn rate(&self) -> f64 {
        let bucket = self.bucket.lock().expect("rate limiter mutex poisoned");
        bucket.refill_rate
    }
}

fn refill(bucket: &mut TokenBucket) {
    let now = Instant::now();
    let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
    bucket.tokens = (bucket.tokens + elapsed * bucket.refill_rate).min(bucket.capacity);
    bucket.last_refill = now;
}
