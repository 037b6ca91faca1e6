//! # Hashpulse Core
//!
//! A resilient aggregation client for a public Bitcoin mining network
//! statistics API.
//!
//! ## Overview
//!
//! The crate wraps roughly a dozen upstream JSON resources behind a single
//! [`StatsClient`] that caches validated responses, enforces a shared
//! client-side request budget, and maps every failure into a closed
//! three-kind taxonomy. Composite queries fan out concurrently and degrade
//! gracefully: a report carries whatever data arrived alongside the reasons
//! for whatever did not.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregate`] | Concurrent fan-out, partial-failure reports |
//! | [`cache`] | TTL response cache with lazy expiry |
//! | [`circuit_breaker`] | Breaker guarding upstream transport calls |
//! | [`client`] | Endpoint client, one method per resource |
//! | [`config`] | Construction-time configuration |
//! | [`domain`] | Validated payload types |
//! | [`endpoint`] | Endpoint identity, cache keys, TTL defaults |
//! | [`error`] | The `Network` / `Api` / `Validation` taxonomy |
//! | [`health`] | Composite network health scoring |
//! | [`http_client`] | Transport abstraction over reqwest |
//! | [`throttle`] | Shared token-bucket request budget |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hashpulse_core::{ClientConfig, OverviewOptions, StatsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StatsClient::new(ClientConfig::default());
//!
//!     // Single endpoint: cache -> budget -> transport -> validate.
//!     let mempool = client.mempool().await?;
//!     println!("{} transactions waiting", mempool.tx_count);
//!
//!     // Composite: concurrent fan-out that tolerates partial failure.
//!     let report = client.network_overview(OverviewOptions::default()).await?;
//!     for (name, reason) in &report.failed {
//!         eprintln!("{name} unavailable: {reason}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fetch settles to a [`FetchError`] of exactly one kind:
//!
//! ```rust
//! use hashpulse_core::{ErrorKind, FetchError};
//!
//! fn describe(error: &FetchError) -> &'static str {
//!     match error.kind() {
//!         ErrorKind::Network => "transient; includes throttle denials and timeouts",
//!         ErrorKind::Api => "upstream answered with a non-success status",
//!         ErrorKind::Validation => "payload did not match the expected shape",
//!     }
//! }
//! ```

pub mod aggregate;
pub mod cache;
pub mod circuit_breaker;
pub mod client;
pub mod config;
pub mod domain;
pub mod endpoint;
pub mod error;
pub mod health;
pub mod http_client;
pub mod throttle;

// Re-export commonly used types at the crate root for convenience

pub use aggregate::{aggregate, AggregateError, AggregationReport, OverviewOptions, SubRequest};
pub use cache::CacheStore;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use client::{BlocksQuery, HistoryRange, ProfitabilityQuery, StatsClient};
pub use config::{BudgetConfig, ClientConfig, TtlTable, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use domain::{
    BlockSummary, BlocksPage, DifficultyStats, DomainError, FeeEstimates, HalvingStatus,
    HardwareSpec, HardwareSpecs, HashpriceQuote, HashrateHistory, HashratePoint, MempoolStats,
    NetworkHashrate, PoolDistribution, PoolShare, PriceTick, ProfitabilityEstimate,
};
pub use endpoint::{cache_key, Endpoint, QueryParams};
pub use error::{ErrorKind, FetchError};
pub use health::{
    score_network_health, AlertSeverity, HealthAlert, HealthBreakdown, HealthComponent,
    NetworkHealth,
};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use throttle::RequestBudget;
