//! Concurrent fan-out with partial-failure tolerance.
//!
//! The central design decision of the crate: availability of the aggregate
//! result is prioritized over completeness. Sub-requests run concurrently,
//! every one settles, and a caller gets whatever subset of data arrived,
//! annotated with which pieces are missing and why. Only the loss of every
//! critical sub-request escalates to a hard failure.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::client::{BlocksQuery, HistoryRange, StatsClient};
use crate::error::FetchError;

type SubRequestFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, FetchError>> + Send + 'a>>;

/// One named unit of a fan-out.
pub struct SubRequest<'a> {
    name: &'static str,
    critical: bool,
    task: SubRequestFuture<'a>,
}

impl<'a> SubRequest<'a> {
    pub fn new(
        name: &'static str,
        task: impl Future<Output = Result<Value, FetchError>> + Send + 'a,
    ) -> Self {
        Self {
            name,
            critical: false,
            task: Box::pin(task),
        }
    }

    pub fn critical(
        name: &'static str,
        task: impl Future<Output = Result<Value, FetchError>> + Send + 'a,
    ) -> Self {
        Self {
            name,
            critical: true,
            task: Box::pin(task),
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn is_critical(&self) -> bool {
        self.critical
    }
}

/// Outcome of one fan-out. Every requested name appears in exactly one of
/// the two maps; the report is immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationReport {
    pub succeeded: BTreeMap<String, Value>,
    pub failed: BTreeMap<String, String>,
}

impl AggregationReport {
    pub fn requested(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Re-type one successful payload, e.g. for health scoring.
    pub fn payload<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.succeeded
            .get(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Hard aggregation failure: every critical sub-request failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AggregateError {
    #[error("all critical endpoints failed")]
    CriticalEndpointsFailed { failed: BTreeMap<String, String> },
}

/// Run every sub-request concurrently and wait for all of them to settle.
///
/// A failing or slow sub-request never cancels its siblings; failures become
/// report entries. The call itself fails only when critical sub-requests
/// were designated and every one of them failed.
pub async fn aggregate(requests: Vec<SubRequest<'_>>) -> Result<AggregationReport, AggregateError> {
    let settled = join_all(requests.into_iter().map(|request| async move {
        let outcome = request.task.await;
        (request.name, request.critical, outcome)
    }))
    .await;

    let mut report = AggregationReport::default();
    let mut critical_total = 0_usize;
    let mut critical_failed = 0_usize;

    for (name, critical, outcome) in settled {
        if critical {
            critical_total += 1;
        }
        match outcome {
            Ok(value) => {
                report.succeeded.insert(name.to_owned(), value);
            }
            Err(error) => {
                tracing::debug!(endpoint = name, reason = %error, "sub-request failed");
                if critical {
                    critical_failed += 1;
                }
                report.failed.insert(name.to_owned(), error.reason());
            }
        }
    }

    if critical_total > 0 && critical_failed == critical_total {
        return Err(AggregateError::CriticalEndpointsFailed {
            failed: report.failed,
        });
    }

    Ok(report)
}

fn erase<T: Serialize>(result: Result<T, FetchError>) -> Result<Value, FetchError> {
    result.and_then(|payload| {
        serde_json::to_value(&payload).map_err(|error| {
            FetchError::validation(format!("payload serialization failed: {error}"), Value::Null)
        })
    })
}

/// Knobs for [`StatsClient::network_overview`]. Optional sub-requests are
/// omitted from the fan-out entirely when not asked for, never reported as
/// failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverviewOptions {
    /// Also fetch daily hashrate history for this window.
    pub history: Option<HistoryRange>,
    /// Also fetch the pool distribution (top ten pools).
    pub include_pools: bool,
}

impl StatsClient {
    /// Composite network snapshot: hashrate, difficulty, and mempool are
    /// critical; market and block context degrade gracefully.
    pub async fn network_overview(
        &self,
        options: OverviewOptions,
    ) -> Result<AggregationReport, AggregateError> {
        let mut requests = vec![
            SubRequest::critical("network_hashrate", async {
                erase(self.network_hashrate().await)
            }),
            SubRequest::critical("difficulty", async { erase(self.difficulty().await) }),
            SubRequest::critical("mempool", async { erase(self.mempool().await) }),
            SubRequest::new("bitcoin_price", async { erase(self.bitcoin_price().await) }),
            SubRequest::new("fee_estimates", async { erase(self.fee_estimates().await) }),
            SubRequest::new("recent_blocks", async {
                erase(self.recent_blocks(&BlocksQuery::default()).await)
            }),
        ];

        if let Some(range) = options.history {
            requests.push(SubRequest::new("hashrate_history", async move {
                erase(self.hashrate_history(&range).await)
            }));
        }
        if options.include_pools {
            requests.push(SubRequest::new("pool_distribution", async {
                erase(self.pool_distribution(10).await)
            }));
        }

        aggregate(requests).await
    }

    /// Composite market snapshot: spot price is critical, revenue and fee
    /// context are best-effort.
    pub async fn market_snapshot(&self) -> Result<AggregationReport, AggregateError> {
        let requests = vec![
            SubRequest::critical("bitcoin_price", async { erase(self.bitcoin_price().await) }),
            SubRequest::new("hashprice", async { erase(self.hashprice().await) }),
            SubRequest::new("fee_estimates", async { erase(self.fee_estimates().await) }),
        ];

        aggregate(requests).await
    }
}
