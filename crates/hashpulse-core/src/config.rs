//! Construction-time configuration for the stats client.

use std::collections::HashMap;
use std::time::Duration;

use crate::circuit_breaker::CircuitBreakerConfig;
use crate::endpoint::Endpoint;

pub const DEFAULT_BASE_URL: &str = "https://api.blockstats.network";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Token-bucket parameters for the shared request budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetConfig {
    /// Maximum burst of immediately admitted requests.
    pub capacity: u32,
    /// Sustained refill rate in tokens per second.
    pub refill_per_sec: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            refill_per_sec: 2.0,
        }
    }
}

/// Per-endpoint staleness tolerance, seeded from [`Endpoint::default_ttl`].
#[derive(Debug, Clone, Default)]
pub struct TtlTable {
    overrides: HashMap<Endpoint, Duration>,
}

impl TtlTable {
    pub fn with_ttl(mut self, endpoint: Endpoint, ttl: Duration) -> Self {
        self.overrides.insert(endpoint, ttl);
        self
    }

    pub fn ttl_for(&self, endpoint: Endpoint) -> Duration {
        self.overrides
            .get(&endpoint)
            .copied()
            .unwrap_or_else(|| endpoint.default_ttl())
    }
}

/// Immutable client configuration, supplied once at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub ttl: TtlTable,
    pub budget: BudgetConfig,
    pub breaker: CircuitBreakerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: DEFAULT_TIMEOUT,
            ttl: TtlTable::default(),
            budget: BudgetConfig::default(),
            breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ttl(mut self, endpoint: Endpoint, ttl: Duration) -> Self {
        self.ttl = self.ttl.with_ttl(endpoint, ttl);
        self
    }

    pub fn with_budget(mut self, budget: BudgetConfig) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_breaker(mut self, breaker: CircuitBreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}
