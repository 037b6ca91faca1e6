//! Endpoint identity, cache keys, and staleness defaults.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// One remote resource of the upstream statistics API.
///
/// Paths carry the upstream's own versioning; v1.0 resources paginate with
/// `page`/`page_size`, v2.0 resources take `limit`-style parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    NetworkHashrate,
    HashrateHistory,
    Difficulty,
    Mempool,
    FeeEstimates,
    RecentBlocks,
    PoolDistribution,
    BitcoinPrice,
    Hashprice,
    HalvingStatus,
    Profitability,
    HardwareSpecs,
}

impl Endpoint {
    pub const ALL: [Self; 12] = [
        Self::NetworkHashrate,
        Self::HashrateHistory,
        Self::Difficulty,
        Self::Mempool,
        Self::FeeEstimates,
        Self::RecentBlocks,
        Self::PoolDistribution,
        Self::BitcoinPrice,
        Self::Hashprice,
        Self::HalvingStatus,
        Self::Profitability,
        Self::HardwareSpecs,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkHashrate => "network_hashrate",
            Self::HashrateHistory => "hashrate_history",
            Self::Difficulty => "difficulty",
            Self::Mempool => "mempool",
            Self::FeeEstimates => "fee_estimates",
            Self::RecentBlocks => "recent_blocks",
            Self::PoolDistribution => "pool_distribution",
            Self::BitcoinPrice => "bitcoin_price",
            Self::Hashprice => "hashprice",
            Self::HalvingStatus => "halving_status",
            Self::Profitability => "profitability",
            Self::HardwareSpecs => "hardware_specs",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::NetworkHashrate => "/v2.0/network/hashrate",
            Self::HashrateHistory => "/v2.0/network/hashrate/history",
            Self::Difficulty => "/v1.0/network/difficulty",
            Self::Mempool => "/v1.0/network/mempool",
            Self::FeeEstimates => "/v1.0/network/fees",
            Self::RecentBlocks => "/v1.0/blocks",
            Self::PoolDistribution => "/v1.0/pools",
            Self::BitcoinPrice => "/v2.0/market/price",
            Self::Hashprice => "/v2.0/market/hashprice",
            Self::HalvingStatus => "/v1.0/network/halving",
            Self::Profitability => "/v2.0/calculator/profitability",
            Self::HardwareSpecs => "/v2.0/hardware/specs",
        }
    }

    /// Hardware lookup is the one POST resource; everything else is GET.
    pub const fn is_post(self) -> bool {
        matches!(self, Self::HardwareSpecs)
    }

    /// Staleness tolerance per resource. Mempool contents churn by the
    /// minute; difficulty moves once per ~2016-block epoch.
    pub const fn default_ttl(self) -> Duration {
        match self {
            Self::Mempool | Self::FeeEstimates => Duration::from_secs(30),
            Self::BitcoinPrice => Duration::from_secs(60),
            Self::Hashprice | Self::RecentBlocks => Duration::from_secs(120),
            Self::NetworkHashrate | Self::Profitability => Duration::from_secs(300),
            Self::PoolDistribution => Duration::from_secs(600),
            Self::HashrateHistory => Duration::from_secs(900),
            Self::Difficulty | Self::HalvingStatus => Duration::from_secs(3600),
            Self::HardwareSpecs => Duration::from_secs(86_400),
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameter set with deterministic ordering.
///
/// Backed by a `BTreeMap` so two logically identical requests serialize to
/// the same cache key and query string regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<&'static str, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &'static str, value: impl ToString) -> Self {
        self.values.insert(name, value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Percent-encoded query string, keys in sorted order.
    pub fn query_string(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Deterministic cache key for one logical request.
///
/// Two requests that differ only in parameter insertion order produce the
/// same key; any differing parameter or body value produces a distinct one.
pub fn cache_key(endpoint: Endpoint, params: &QueryParams, body: Option<&str>) -> String {
    let mut key = String::from(endpoint.path());
    if !params.is_empty() {
        key.push('?');
        key.push_str(&params.query_string());
    }
    if let Some(body) = body {
        key.push('#');
        key.push_str(body);
    }
    key
}
