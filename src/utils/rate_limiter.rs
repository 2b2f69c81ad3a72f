use governor::{Quota, RateLimiter as GovernorRateLimiter};
use nonzero_ext::*;
use std::time::Duration;
use tokio::time::sleep;

/// Paces outbound API requests: one request per configured period. The
/// first call goes through immediately; subsequent calls wait out the
/// remainder of the period.
pub struct RateLimiter {
    limiter: GovernorRateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl RateLimiter {
    pub fn with_period(period: Duration) -> Self {
        // A zero period degenerates to effectively unlimited.
        let quota = Quota::with_period(period).unwrap_or_else(|| Quota::per_second(nonzero!(1000u32)));
        Self {
            limiter: GovernorRateLimiter::direct(quota),
        }
    }

    /// Wait until a request is allowed.
    pub async fn wait(&self) {
        while self.limiter.check().is_err() {
            sleep(Duration::from_millis(50)).await;
        }
    }
}
