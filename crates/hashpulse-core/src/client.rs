//! The endpoint client: one method per upstream resource.
//!
//! Every method runs the same pipeline, strictly in order: cache lookup,
//! budget admission, breaker-guarded transport, shape validation, cache
//! store. Cache hits return before the limiter or transport are touched;
//! invalid payloads are never stored.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use time::Date;

use crate::cache::CacheStore;
use crate::circuit_breaker::CircuitBreaker;
use crate::config::ClientConfig;
use crate::domain::{
    BlockSummary, BlocksPage, DifficultyStats, DomainError, FeeEstimates, HalvingStatus,
    HardwareSpec, HardwareSpecs, HashpriceQuote, HashrateHistory, HashratePoint, MempoolStats,
    NetworkHashrate, PoolDistribution, PoolShare, PriceTick, ProfitabilityEstimate,
};
use crate::endpoint::{cache_key, Endpoint, QueryParams};
use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::throttle::RequestBudget;

/// Inclusive date window for history queries, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRange {
    start: Date,
    end: Date,
}

impl HistoryRange {
    pub fn new(start: Date, end: Date) -> Result<Self, FetchError> {
        if start > end {
            return Err(FetchError::validation(
                "history range start must not be after end",
                json!({ "start": format_date(start), "end": format_date(end) }),
            ));
        }
        Ok(Self { start, end })
    }

    fn params(&self) -> QueryParams {
        QueryParams::new()
            .set("start", format_date(self.start))
            .set("end", format_date(self.end))
    }
}

fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Pagination for the v1.0 blocks resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlocksQuery {
    page: u32,
    page_size: u32,
}

impl BlocksQuery {
    pub fn new(page: u32, page_size: u32) -> Result<Self, FetchError> {
        if page == 0 {
            return Err(FetchError::validation(
                "blocks page numbering starts at 1",
                json!({ "page": page }),
            ));
        }
        if page_size == 0 || page_size > 100 {
            return Err(FetchError::validation(
                "blocks page_size must be between 1 and 100",
                json!({ "page_size": page_size }),
            ));
        }
        Ok(Self { page, page_size })
    }

    fn params(&self) -> QueryParams {
        QueryParams::new()
            .set("page", self.page)
            .set("page_size", self.page_size)
    }
}

impl Default for BlocksQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
        }
    }
}

/// Tuning inputs for the profitability calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitabilityQuery {
    hashrate_ths: f64,
    power_watts: u32,
    electricity_usd_kwh: f64,
}

impl ProfitabilityQuery {
    pub fn new(
        hashrate_ths: f64,
        power_watts: u32,
        electricity_usd_kwh: f64,
    ) -> Result<Self, FetchError> {
        let raw = json!({
            "hashrate_ths": hashrate_ths,
            "power_watts": power_watts,
            "electricity_usd_kwh": electricity_usd_kwh,
        });
        if !hashrate_ths.is_finite() || hashrate_ths <= 0.0 {
            return Err(FetchError::validation(
                "hashrate_ths must be a positive number",
                raw,
            ));
        }
        if power_watts == 0 {
            return Err(FetchError::validation("power_watts must be positive", raw));
        }
        if !electricity_usd_kwh.is_finite() || electricity_usd_kwh < 0.0 {
            return Err(FetchError::validation(
                "electricity_usd_kwh must be non-negative",
                raw,
            ));
        }
        Ok(Self {
            hashrate_ths,
            power_watts,
            electricity_usd_kwh,
        })
    }

    fn params(&self) -> QueryParams {
        QueryParams::new()
            .set("hashrate_ths", self.hashrate_ths)
            .set("power_w", self.power_watts)
            .set("electricity_usd_kwh", self.electricity_usd_kwh)
    }
}

/// Aggregation client for the upstream mining statistics API.
///
/// Holds all process-wide mutable state: the response cache, the shared
/// request budget, and the upstream circuit breaker. Construct once and
/// share; configuration is immutable after construction.
pub struct StatsClient {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
    cache: CacheStore,
    budget: RequestBudget,
    breaker: Arc<CircuitBreaker>,
}

impl StatsClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        let budget = RequestBudget::from_config(&config.budget);
        let breaker = Arc::new(CircuitBreaker::new(config.breaker));
        Self {
            config,
            http,
            cache: CacheStore::new(),
            budget,
            breaker,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Drop every cached response. Budget and breaker state are untouched.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }

    // ------------------------------------------------------------------
    // Endpoint methods
    // ------------------------------------------------------------------

    pub async fn network_hashrate(&self) -> Result<NetworkHashrate, FetchError> {
        self.fetch_endpoint(
            Endpoint::NetworkHashrate,
            QueryParams::new(),
            None,
            normalize_network_hashrate,
        )
        .await
    }

    pub async fn hashrate_history(
        &self,
        range: &HistoryRange,
    ) -> Result<HashrateHistory, FetchError> {
        self.fetch_endpoint(
            Endpoint::HashrateHistory,
            range.params(),
            None,
            normalize_hashrate_history,
        )
        .await
    }

    pub async fn difficulty(&self) -> Result<DifficultyStats, FetchError> {
        self.fetch_endpoint(
            Endpoint::Difficulty,
            QueryParams::new(),
            None,
            normalize_difficulty,
        )
        .await
    }

    pub async fn mempool(&self) -> Result<MempoolStats, FetchError> {
        self.fetch_endpoint(Endpoint::Mempool, QueryParams::new(), None, normalize_mempool)
            .await
    }

    pub async fn fee_estimates(&self) -> Result<FeeEstimates, FetchError> {
        self.fetch_endpoint(
            Endpoint::FeeEstimates,
            QueryParams::new(),
            None,
            normalize_fees,
        )
        .await
    }

    pub async fn recent_blocks(&self, query: &BlocksQuery) -> Result<BlocksPage, FetchError> {
        self.fetch_endpoint(
            Endpoint::RecentBlocks,
            query.params(),
            None,
            normalize_blocks_page,
        )
        .await
    }

    pub async fn pool_distribution(&self, limit: u32) -> Result<PoolDistribution, FetchError> {
        if limit == 0 {
            return Err(FetchError::validation(
                "pool distribution limit must be positive",
                json!({ "limit": limit }),
            ));
        }
        self.fetch_endpoint(
            Endpoint::PoolDistribution,
            QueryParams::new().set("limit", limit),
            None,
            normalize_pool_distribution,
        )
        .await
    }

    pub async fn bitcoin_price(&self) -> Result<PriceTick, FetchError> {
        self.fetch_endpoint(
            Endpoint::BitcoinPrice,
            QueryParams::new(),
            None,
            normalize_price,
        )
        .await
    }

    pub async fn hashprice(&self) -> Result<HashpriceQuote, FetchError> {
        self.fetch_endpoint(
            Endpoint::Hashprice,
            QueryParams::new(),
            None,
            normalize_hashprice,
        )
        .await
    }

    pub async fn halving_status(&self) -> Result<HalvingStatus, FetchError> {
        self.fetch_endpoint(
            Endpoint::HalvingStatus,
            QueryParams::new(),
            None,
            normalize_halving,
        )
        .await
    }

    pub async fn profitability(
        &self,
        query: &ProfitabilityQuery,
    ) -> Result<ProfitabilityEstimate, FetchError> {
        self.fetch_endpoint(
            Endpoint::Profitability,
            query.params(),
            None,
            normalize_profitability,
        )
        .await
    }

    /// Hardware lookup, the one POST resource. The model list is sorted and
    /// deduplicated so logically identical lookups share a cache entry.
    pub async fn hardware_specs(&self, models: &[String]) -> Result<HardwareSpecs, FetchError> {
        let mut requested: Vec<String> = models
            .iter()
            .map(|model| model.trim().to_owned())
            .filter(|model| !model.is_empty())
            .collect();
        requested.sort();
        requested.dedup();

        if requested.is_empty() {
            return Err(FetchError::validation(
                "hardware lookup requires at least one model name",
                json!({ "models": models }),
            ));
        }

        let body = json!({ "models": requested }).to_string();
        self.fetch_endpoint(
            Endpoint::HardwareSpecs,
            QueryParams::new(),
            Some(body),
            normalize_hardware_specs,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    async fn fetch_endpoint<T, F>(
        &self,
        endpoint: Endpoint,
        params: QueryParams,
        body: Option<String>,
        normalize: F,
    ) -> Result<T, FetchError>
    where
        F: Fn(&Value) -> Result<T, FetchError>,
    {
        let key = cache_key(endpoint, &params, body.as_deref());

        if let Some(hit) = self.cache.get(&key).await {
            if let Ok(value) = serde_json::from_str::<Value>(&hit) {
                tracing::debug!(endpoint = %endpoint, "cache hit");
                return normalize(&value);
            }
        }

        if let Err(retry_after) = self.budget.try_acquire() {
            tracing::warn!(
                endpoint = %endpoint,
                retry_after_ms = retry_after.as_millis() as u64,
                "request budget exhausted"
            );
            return Err(FetchError::network(format!(
                "request budget exhausted; retry in {}ms",
                retry_after.as_millis()
            )));
        }

        let value = self.transport(endpoint, &params, body).await?;
        let typed = normalize(&value)?;

        let ttl = self.config.ttl.ttl_for(endpoint);
        self.cache.put(key, value.to_string(), ttl).await;
        tracing::debug!(endpoint = %endpoint, ttl_secs = ttl.as_secs(), "response cached");

        Ok(typed)
    }

    async fn transport(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
        body: Option<String>,
    ) -> Result<Value, FetchError> {
        if !self.breaker.allow_request() {
            return Err(FetchError::network(format!(
                "upstream circuit is open; skipping call to {}",
                endpoint.path()
            )));
        }

        let mut url = self.config.url_for(endpoint);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.query_string());
        }

        let base = if endpoint.is_post() {
            HttpRequest::post(url).with_json_body(body.unwrap_or_else(|| String::from("{}")))
        } else {
            HttpRequest::get(url)
        };
        let request = base
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout.as_millis() as u64);

        let response = self.http.execute(request).await.map_err(|error| {
            self.breaker.record_failure();
            tracing::warn!(endpoint = %endpoint, error = %error, "transport failure");
            if error.timed_out() {
                FetchError::network_caused_by("request timed out", error.message())
            } else {
                FetchError::network_caused_by("connection failure", error.message())
            }
        })?;

        if !response.is_success() {
            self.breaker.record_failure();
            tracing::warn!(endpoint = %endpoint, status = response.status, "upstream error status");
            return Err(FetchError::api(response.status, endpoint.path()));
        }

        self.breaker.record_success();

        serde_json::from_str(&response.body).map_err(|error| {
            FetchError::validation(
                format!("response body is not valid JSON: {error}"),
                Value::String(response.body.clone()),
            )
        })
    }
}

// ----------------------------------------------------------------------
// Wire payloads and normalization
// ----------------------------------------------------------------------

fn parse_raw<T: DeserializeOwned>(value: &Value) -> Result<T, FetchError> {
    serde_json::from_value(value.clone())
        .map_err(|error| FetchError::validation(format!("unexpected response shape: {error}"), value.clone()))
}

fn require<T>(field: Option<T>, name: &str, raw: &Value) -> Result<T, FetchError> {
    field.ok_or_else(|| {
        FetchError::validation(format!("required field '{name}' is missing"), raw.clone())
    })
}

fn domain_error(raw: &Value) -> impl Fn(DomainError) -> FetchError + '_ {
    move |error| FetchError::validation(error.to_string(), raw.clone())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNetworkHashrate {
    current_hashrate: Option<f64>,
    #[serde(rename = "average30d")]
    average_30d: Option<f64>,
    unit: Option<String>,
    timestamp: Option<i64>,
}

fn normalize_network_hashrate(value: &Value) -> Result<NetworkHashrate, FetchError> {
    let raw: RawNetworkHashrate = parse_raw(value)?;
    NetworkHashrate::new(
        require(raw.current_hashrate, "currentHashrate", value)?,
        require(raw.average_30d, "average30d", value)?,
        raw.unit.unwrap_or_else(|| String::from("EH/s")),
        require(raw.timestamp, "timestamp", value)?,
    )
    .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
struct RawHashratePoint {
    date: Option<String>,
    hashrate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawHashrateHistory {
    unit: Option<String>,
    samples: Option<Vec<RawHashratePoint>>,
}

fn normalize_hashrate_history(value: &Value) -> Result<HashrateHistory, FetchError> {
    let raw: RawHashrateHistory = parse_raw(value)?;
    let samples = require(raw.samples, "samples", value)?
        .into_iter()
        .map(|point| {
            HashratePoint::new(
                require(point.date, "samples.date", value)?,
                require(point.hashrate, "samples.hashrate", value)?,
            )
            .map_err(domain_error(value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    HashrateHistory::new(raw.unit.unwrap_or_else(|| String::from("EH/s")), samples)
        .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDifficulty {
    difficulty: Option<f64>,
    blocks_until_adjustment: Option<u32>,
    estimated_change_percent: Option<f64>,
    last_change_percent: Option<f64>,
    next_adjustment_eta: Option<i64>,
}

fn normalize_difficulty(value: &Value) -> Result<DifficultyStats, FetchError> {
    let raw: RawDifficulty = parse_raw(value)?;
    DifficultyStats::new(
        require(raw.difficulty, "difficulty", value)?,
        require(raw.blocks_until_adjustment, "blocksUntilAdjustment", value)?,
        require(raw.estimated_change_percent, "estimatedChangePercent", value)?,
        raw.last_change_percent,
        raw.next_adjustment_eta,
    )
    .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMempool {
    tx_count: Option<u64>,
    vsize_mb: Option<f64>,
    avg_fee_rate: Option<f64>,
    median_fee_rate: Option<f64>,
}

fn normalize_mempool(value: &Value) -> Result<MempoolStats, FetchError> {
    let raw: RawMempool = parse_raw(value)?;
    MempoolStats::new(
        require(raw.tx_count, "txCount", value)?,
        require(raw.vsize_mb, "vsizeMb", value)?,
        require(raw.avg_fee_rate, "avgFeeRate", value)?,
        raw.median_fee_rate,
    )
    .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFees {
    fastest: Option<f64>,
    half_hour: Option<f64>,
    hour: Option<f64>,
    economy: Option<f64>,
    minimum: Option<f64>,
}

fn normalize_fees(value: &Value) -> Result<FeeEstimates, FetchError> {
    let raw: RawFees = parse_raw(value)?;
    FeeEstimates::new(
        require(raw.fastest, "fastest", value)?,
        require(raw.half_hour, "halfHour", value)?,
        require(raw.hour, "hour", value)?,
        require(raw.economy, "economy", value)?,
        raw.minimum,
    )
    .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    height: Option<u64>,
    hash: Option<String>,
    timestamp: Option<i64>,
    tx_count: Option<u32>,
    size_bytes: Option<u64>,
    total_fees_btc: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlocksPage {
    page: Option<u32>,
    page_size: Option<u32>,
    blocks: Option<Vec<RawBlock>>,
}

fn normalize_blocks_page(value: &Value) -> Result<BlocksPage, FetchError> {
    let raw: RawBlocksPage = parse_raw(value)?;
    let blocks = require(raw.blocks, "blocks", value)?
        .into_iter()
        .map(|block| {
            BlockSummary::new(
                require(block.height, "blocks.height", value)?,
                require(block.hash, "blocks.hash", value)?,
                require(block.timestamp, "blocks.timestamp", value)?,
                require(block.tx_count, "blocks.txCount", value)?,
                require(block.size_bytes, "blocks.sizeBytes", value)?,
                block.total_fees_btc,
            )
            .map_err(domain_error(value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BlocksPage {
        page: require(raw.page, "page", value)?,
        page_size: require(raw.page_size, "pageSize", value)?,
        blocks,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPool {
    name: Option<String>,
    share_percent: Option<f64>,
    blocks_found: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawPoolDistribution {
    window: Option<String>,
    pools: Option<Vec<RawPool>>,
}

fn normalize_pool_distribution(value: &Value) -> Result<PoolDistribution, FetchError> {
    let raw: RawPoolDistribution = parse_raw(value)?;
    let pools = require(raw.pools, "pools", value)?
        .into_iter()
        .map(|pool| {
            PoolShare::new(
                require(pool.name, "pools.name", value)?,
                require(pool.share_percent, "pools.sharePercent", value)?,
                require(pool.blocks_found, "pools.blocksFound", value)?,
            )
            .map_err(domain_error(value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PoolDistribution {
        window: raw.window.unwrap_or_else(|| String::from("24h")),
        pools,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrice {
    usd: Option<f64>,
    #[serde(rename = "change24hPercent")]
    change_24h_percent: Option<f64>,
    timestamp: Option<i64>,
}

fn normalize_price(value: &Value) -> Result<PriceTick, FetchError> {
    let raw: RawPrice = parse_raw(value)?;
    PriceTick::new(
        require(raw.usd, "usd", value)?,
        require(raw.change_24h_percent, "change24hPercent", value)?,
        raw.timestamp,
    )
    .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHashprice {
    usd_per_ph_per_day: Option<f64>,
    btc_per_ph_per_day: Option<f64>,
}

fn normalize_hashprice(value: &Value) -> Result<HashpriceQuote, FetchError> {
    let raw: RawHashprice = parse_raw(value)?;
    HashpriceQuote::new(
        require(raw.usd_per_ph_per_day, "usdPerPhPerDay", value)?,
        raw.btc_per_ph_per_day,
    )
    .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHalving {
    blocks_remaining: Option<u64>,
    estimated_date: Option<String>,
    current_subsidy_btc: Option<f64>,
    next_subsidy_btc: Option<f64>,
}

fn normalize_halving(value: &Value) -> Result<HalvingStatus, FetchError> {
    let raw: RawHalving = parse_raw(value)?;
    HalvingStatus::new(
        require(raw.blocks_remaining, "blocksRemaining", value)?,
        require(raw.estimated_date, "estimatedDate", value)?,
        require(raw.current_subsidy_btc, "currentSubsidyBtc", value)?,
        require(raw.next_subsidy_btc, "nextSubsidyBtc", value)?,
    )
    .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfitability {
    daily_revenue_usd: Option<f64>,
    daily_power_cost_usd: Option<f64>,
    daily_profit_usd: Option<f64>,
    break_even_electricity_usd_kwh: Option<f64>,
}

fn normalize_profitability(value: &Value) -> Result<ProfitabilityEstimate, FetchError> {
    let raw: RawProfitability = parse_raw(value)?;
    ProfitabilityEstimate::new(
        require(raw.daily_revenue_usd, "dailyRevenueUsd", value)?,
        require(raw.daily_power_cost_usd, "dailyPowerCostUsd", value)?,
        require(raw.daily_profit_usd, "dailyProfitUsd", value)?,
        raw.break_even_electricity_usd_kwh,
    )
    .map_err(domain_error(value))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHardwareModel {
    model: Option<String>,
    hashrate_ths: Option<f64>,
    power_watts: Option<u32>,
    #[serde(rename = "efficiencyJTh")]
    efficiency_j_th: Option<f64>,
    release_year: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct RawHardwareSpecs {
    models: Option<Vec<RawHardwareModel>>,
}

fn normalize_hardware_specs(value: &Value) -> Result<HardwareSpecs, FetchError> {
    let raw: RawHardwareSpecs = parse_raw(value)?;
    let models = require(raw.models, "models", value)?
        .into_iter()
        .map(|model| {
            HardwareSpec::new(
                require(model.model, "models.model", value)?,
                require(model.hashrate_ths, "models.hashrateThs", value)?,
                require(model.power_watts, "models.powerWatts", value)?,
                require(model.efficiency_j_th, "models.efficiencyJTh", value)?,
                model.release_year,
            )
            .map_err(domain_error(value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HardwareSpecs { models })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use time::macros::date;

    #[test]
    fn history_range_rejects_inverted_windows() {
        let error = HistoryRange::new(date!(2026 - 07 - 31), date!(2026 - 07 - 01))
            .expect_err("inverted range must be rejected");
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn history_range_serializes_iso_dates() {
        let range =
            HistoryRange::new(date!(2026 - 07 - 01), date!(2026 - 07 - 31)).expect("valid range");
        assert_eq!(
            range.params().query_string(),
            "end=2026-07-31&start=2026-07-01"
        );
    }

    #[test]
    fn blocks_query_validates_pagination() {
        assert!(BlocksQuery::new(1, 25).is_ok());
        assert!(BlocksQuery::new(0, 25).is_err());
        assert!(BlocksQuery::new(1, 0).is_err());
        assert!(BlocksQuery::new(1, 500).is_err());
    }

    #[test]
    fn profitability_query_rejects_nonsense_inputs() {
        assert!(ProfitabilityQuery::new(120.0, 3250, 0.06).is_ok());
        assert!(ProfitabilityQuery::new(-5.0, 3250, 0.06).is_err());
        assert!(ProfitabilityQuery::new(120.0, 0, 0.06).is_err());
        assert!(ProfitabilityQuery::new(120.0, 3250, f64::NAN).is_err());
    }

    #[test]
    fn normalize_rejects_wrong_primitive_types() {
        let value = json!({
            "txCount": "lots",
            "vsizeMb": 12.4,
            "avgFeeRate": 4.0,
        });
        let error = normalize_mempool(&value).expect_err("string txCount must be rejected");
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn normalize_reports_the_missing_field_by_name() {
        let value = json!({
            "vsizeMb": 12.4,
            "avgFeeRate": 4.0,
        });
        let error = normalize_mempool(&value).expect_err("missing txCount must be rejected");
        assert!(error.reason().contains("txCount"));
    }

    #[test]
    fn normalize_keeps_optional_fields_optional() {
        let value = json!({
            "txCount": 3000,
            "vsizeMb": 12.4,
            "avgFeeRate": 4.0,
        });
        let stats = normalize_mempool(&value).expect("valid payload");
        assert_eq!(stats.median_fee_rate, None);
    }
}
