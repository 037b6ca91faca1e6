use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Circuit state for upstream transport calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Breaker thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that trip the circuit open.
    pub trip_after: u32,
    /// How long the circuit stays open before a half-open probe is allowed.
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            trip_after: 5,
            cooldown: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_streak: u32,
    tripped_at: Option<Instant>,
}

/// Thread-safe circuit breaker shared by all transport calls to the upstream.
///
/// Open circuits short-circuit the transport step; the denial reaches callers
/// through the same network-failure path as a throttle denial.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failure_streak: 0,
                tripped_at: None,
            }),
        }
    }

    /// Whether a transport call may proceed. An open circuit transitions to
    /// half-open once its cooldown has elapsed, admitting a single probe.
    pub fn allow_request(&self) -> bool {
        let mut inner = self.inner.lock().expect("breaker lock is not poisoned");
        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let cooled_down = inner
                    .tripped_at
                    .map(|at| at.elapsed() >= self.config.cooldown)
                    .unwrap_or(false);
                if cooled_down {
                    inner.state = CircuitState::HalfOpen;
                    inner.tripped_at = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock().expect("breaker lock is not poisoned");
        inner.state = CircuitState::Closed;
        inner.failure_streak = 0;
        inner.tripped_at = None;
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().expect("breaker lock is not poisoned");
        inner.failure_streak = inner.failure_streak.saturating_add(1);

        let probe_failed = inner.state == CircuitState::HalfOpen;
        if probe_failed || inner.failure_streak >= self.config.trip_after {
            if inner.state != CircuitState::Open {
                tracing::warn!(
                    failures = inner.failure_streak,
                    "upstream circuit tripped open"
                );
            }
            inner.state = CircuitState::Open;
            inner.tripped_at = Some(Instant::now());
        }
    }

    pub fn state(&self) -> CircuitState {
        self.inner
            .lock()
            .expect("breaker lock is not poisoned")
            .state
    }

    pub fn failure_streak(&self) -> u32 {
        self.inner
            .lock()
            .expect("breaker lock is not poisoned")
            .failure_streak
    }
}
