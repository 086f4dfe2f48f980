use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces consecutive requests to one upstream by a minimum interval.
///
/// The first call passes immediately; each later call waits until the interval
/// since the previous one has elapsed. A zero interval disables pacing.
pub struct RequestPacer {
    limiter: Option<DirectRateLimiter>,
    interval: Duration,
}

impl RequestPacer {
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval)
            .map(|quota| RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN)));
        Self { limiter, interval }
    }

    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the next request slot.
    pub async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Claims a slot without waiting; returns false when the caller is early.
    pub fn try_ready(&self) -> bool {
        match &self.limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn second_request_inside_the_interval_is_held_back() {
        let pacer = RequestPacer::new(Duration::from_secs(60));

        assert!(pacer.try_ready());
        assert!(!pacer.try_ready());
    }

    #[test]
    fn zero_interval_never_waits() {
        let pacer = RequestPacer::unpaced();

        for _ in 0..100 {
            assert!(pacer.try_ready());
        }
        assert_eq!(pacer.interval(), Duration::ZERO);
    }

    #[tokio::test]
    async fn ready_spaces_calls_by_the_interval() {
        let pacer = RequestPacer::new(Duration::from_millis(20));
        let started = Instant::now();

        pacer.ready().await;
        pacer.ready().await;
        pacer.ready().await;

        assert!(started.elapsed() >= Duration::from_millis(35));
    }
}
