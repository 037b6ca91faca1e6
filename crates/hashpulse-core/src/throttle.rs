use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

use crate::config::BudgetConfig;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared token-bucket admission control for outbound requests.
///
/// One budget is shared across every endpoint call in the process; cache hits
/// never consume from it. `capacity` bounds the immediate burst and
/// `refill_per_sec` the sustained rate.
#[derive(Clone)]
pub struct RequestBudget {
    limiter: Arc<DirectRateLimiter>,
    clock: DefaultClock,
    capacity: u32,
    refill_per_sec: f64,
}

impl RequestBudget {
    pub fn new(capacity: u32, refill_per_sec: f64) -> Self {
        let clock = DefaultClock::default();
        let quota = quota_from_rate(capacity, refill_per_sec);
        Self {
            limiter: Arc::new(RateLimiter::direct_with_clock(quota, &clock)),
            clock,
            capacity,
            refill_per_sec,
        }
    }

    pub fn from_config(config: &BudgetConfig) -> Self {
        Self::new(config.capacity, config.refill_per_sec)
    }

    /// Tries to admit one request. When the bucket is empty the recommended
    /// wait before retrying is returned instead.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        match self.limiter.check() {
            Ok(()) => Ok(()),
            Err(not_until) => Err(not_until.wait_time_from(self.clock.now())),
        }
    }

    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    pub const fn refill_per_sec(&self) -> f64 {
        self.refill_per_sec
    }
}

fn quota_from_rate(capacity: u32, refill_per_sec: f64) -> Quota {
    let burst = NonZeroU32::new(capacity.max(1)).expect("burst is at least one");

    let seconds_per_token = if refill_per_sec > 0.0 {
        (1.0 / refill_per_sec).max(0.001)
    } else {
        0.001
    };
    let period = Duration::from_secs_f64(seconds_per_token);

    Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst)
}
