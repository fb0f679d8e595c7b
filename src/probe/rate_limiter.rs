//! Rate limiting for probe dispatch.
//!
//! Token bucket pacing so a sweep does not flood the local segment with
//! echo requests.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = GovLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A shared probes-per-second limiter.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` probes per second.
    ///
    /// Returns `None` for a rate of zero, meaning unlimited.
    pub fn new(rate: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rate)?;
        Some(Self {
            limiter: Arc::new(GovLimiter::direct(Quota::per_second(rate))),
        })
    }

    /// Wait until the limiter allows another probe.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_rate_means_unlimited() {
        assert!(RateLimiter::new(0).is_none());
    }

    #[tokio::test]
    async fn test_first_token_is_immediate() {
        let limiter = RateLimiter::new(100).unwrap();
        let waited = tokio::time::timeout(Duration::from_millis(50), limiter.wait()).await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let limiter = RateLimiter::new(1).unwrap();
        let shared = limiter.clone();
        limiter.wait().await;

        let waited = tokio::time::timeout(Duration::from_millis(100), shared.wait()).await;
        assert!(waited.is_err());
    }
}
