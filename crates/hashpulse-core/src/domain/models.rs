use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::macros::format_description;
use time::Date;

/// Field-level contract violations raised by domain constructors.
///
/// The endpoint client maps these into the fetch taxonomy, attaching the raw
/// payload that produced them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("required field '{field}' is missing")]
    MissingField { field: &'static str },
    #[error("field '{field}' must be finite")]
    NonFinite { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    Negative { field: &'static str },
    #[error("field '{field}' must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("field '{field}' must not be empty")]
    Empty { field: &'static str },
    #[error("field '{field}' is not a YYYY-MM-DD date: '{value}'")]
    BadDate { field: &'static str, value: String },
}

fn finite(field: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFinite { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, DomainError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        Err(DomainError::Negative { field })
    } else {
        Ok(value)
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, DomainError> {
    let value = finite(field, value)?;
    if value <= 0.0 {
        Err(DomainError::NotPositive { field })
    } else {
        Ok(value)
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<Date, DomainError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, format).map_err(|_| DomainError::BadDate {
        field,
        value: value.to_owned(),
    })
}

/// Current network hashrate and its 30-sample trailing average, in EH/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkHashrate {
    pub current_ehs: f64,
    pub average_30d_ehs: f64,
    pub unit: String,
    pub as_of: i64,
}

impl NetworkHashrate {
    pub fn new(
        current_ehs: f64,
        average_30d_ehs: f64,
        unit: impl Into<String>,
        as_of: i64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            current_ehs: non_negative("currentHashrate", current_ehs)?,
            average_30d_ehs: positive("average30d", average_30d_ehs)?,
            unit: unit.into(),
            as_of,
        })
    }

    /// Signed percent deviation of current from the trailing average.
    pub fn deviation_percent(&self) -> f64 {
        (self.current_ehs - self.average_30d_ehs) / self.average_30d_ehs * 100.0
    }
}

/// One daily hashrate observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashratePoint {
    pub date: String,
    pub ehs: f64,
}

impl HashratePoint {
    pub fn new(date: impl Into<String>, ehs: f64) -> Result<Self, DomainError> {
        let date = date.into();
        parse_date("samples.date", &date)?;
        Ok(Self {
            date,
            ehs: non_negative("samples.hashrate", ehs)?,
        })
    }
}

/// Hashrate observations over a requested date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashrateHistory {
    pub unit: String,
    pub samples: Vec<HashratePoint>,
}

impl HashrateHistory {
    pub fn new(unit: impl Into<String>, samples: Vec<HashratePoint>) -> Result<Self, DomainError> {
        if samples.is_empty() {
            return Err(DomainError::Empty { field: "samples" });
        }
        Ok(Self {
            unit: unit.into(),
            samples,
        })
    }

    pub fn mean_ehs(&self) -> f64 {
        self.samples.iter().map(|p| p.ehs).sum::<f64>() / self.samples.len() as f64
    }
}

/// Difficulty plus the state of the current adjustment epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub difficulty: f64,
    pub blocks_until_adjustment: u32,
    pub estimated_change_percent: f64,
    pub last_change_percent: Option<f64>,
    pub next_adjustment_eta: Option<i64>,
}

impl DifficultyStats {
    pub fn new(
        difficulty: f64,
        blocks_until_adjustment: u32,
        estimated_change_percent: f64,
        last_change_percent: Option<f64>,
        next_adjustment_eta: Option<i64>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            difficulty: positive("difficulty", difficulty)?,
            blocks_until_adjustment,
            estimated_change_percent: finite("estimatedChangePercent", estimated_change_percent)?,
            last_change_percent,
            next_adjustment_eta,
        })
    }
}

/// Mempool depth and fee pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MempoolStats {
    pub tx_count: u64,
    pub vsize_mb: f64,
    pub avg_fee_rate: f64,
    pub median_fee_rate: Option<f64>,
}

impl MempoolStats {
    pub fn new(
        tx_count: u64,
        vsize_mb: f64,
        avg_fee_rate: f64,
        median_fee_rate: Option<f64>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            tx_count,
            vsize_mb: non_negative("vsizeMb", vsize_mb)?,
            avg_fee_rate: non_negative("avgFeeRate", avg_fee_rate)?,
            median_fee_rate,
        })
    }
}

/// Recommended fee rates in sat/vB per confirmation target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeEstimates {
    pub fastest: f64,
    pub half_hour: f64,
    pub hour: f64,
    pub economy: f64,
    pub minimum: Option<f64>,
}

impl FeeEstimates {
    pub fn new(
        fastest: f64,
        half_hour: f64,
        hour: f64,
        economy: f64,
        minimum: Option<f64>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            fastest: non_negative("fastest", fastest)?,
            half_hour: non_negative("halfHour", half_hour)?,
            hour: non_negative("hour", hour)?,
            economy: non_negative("economy", economy)?,
            minimum,
        })
    }
}

/// One mined block, as listed by the paginated blocks resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub height: u64,
    pub hash: String,
    pub timestamp: i64,
    pub tx_count: u32,
    pub size_bytes: u64,
    pub total_fees_btc: Option<f64>,
}

impl BlockSummary {
    pub fn new(
        height: u64,
        hash: impl Into<String>,
        timestamp: i64,
        tx_count: u32,
        size_bytes: u64,
        total_fees_btc: Option<f64>,
    ) -> Result<Self, DomainError> {
        let hash = hash.into();
        if hash.is_empty() {
            return Err(DomainError::Empty { field: "hash" });
        }
        Ok(Self {
            height,
            hash,
            timestamp,
            tx_count,
            size_bytes,
            total_fees_btc,
        })
    }
}

/// One page of recent blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocksPage {
    pub page: u32,
    pub page_size: u32,
    pub blocks: Vec<BlockSummary>,
}

/// One mining pool's share of recent blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolShare {
    pub name: String,
    pub share_percent: f64,
    pub blocks_found: u32,
}

impl PoolShare {
    pub fn new(
        name: impl Into<String>,
        share_percent: f64,
        blocks_found: u32,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::Empty { field: "pools.name" });
        }
        Ok(Self {
            name,
            share_percent: non_negative("pools.sharePercent", share_percent)?,
            blocks_found,
        })
    }
}

/// Pool distribution over a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolDistribution {
    pub window: String,
    pub pools: Vec<PoolShare>,
}

/// Spot bitcoin price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub usd: f64,
    pub change_24h_percent: f64,
    pub as_of: Option<i64>,
}

impl PriceTick {
    pub fn new(usd: f64, change_24h_percent: f64, as_of: Option<i64>) -> Result<Self, DomainError> {
        Ok(Self {
            usd: positive("usd", usd)?,
            change_24h_percent: finite("change24hPercent", change_24h_percent)?,
            as_of,
        })
    }
}

/// Revenue per petahash per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashpriceQuote {
    pub usd_per_ph_day: f64,
    pub btc_per_ph_day: Option<f64>,
}

impl HashpriceQuote {
    pub fn new(usd_per_ph_day: f64, btc_per_ph_day: Option<f64>) -> Result<Self, DomainError> {
        Ok(Self {
            usd_per_ph_day: non_negative("usdPerPhPerDay", usd_per_ph_day)?,
            btc_per_ph_day,
        })
    }
}

/// Countdown to the next subsidy halving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalvingStatus {
    pub blocks_remaining: u64,
    pub estimated_date: String,
    pub current_subsidy_btc: f64,
    pub next_subsidy_btc: f64,
}

impl HalvingStatus {
    pub fn new(
        blocks_remaining: u64,
        estimated_date: impl Into<String>,
        current_subsidy_btc: f64,
        next_subsidy_btc: f64,
    ) -> Result<Self, DomainError> {
        let estimated_date = estimated_date.into();
        parse_date("estimatedDate", &estimated_date)?;
        Ok(Self {
            blocks_remaining,
            estimated_date,
            current_subsidy_btc: positive("currentSubsidyBtc", current_subsidy_btc)?,
            next_subsidy_btc: non_negative("nextSubsidyBtc", next_subsidy_btc)?,
        })
    }
}

/// Calculator output for a hypothetical mining operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityEstimate {
    pub daily_revenue_usd: f64,
    pub daily_power_cost_usd: f64,
    pub daily_profit_usd: f64,
    pub break_even_electricity_usd_kwh: Option<f64>,
}

impl ProfitabilityEstimate {
    pub fn new(
        daily_revenue_usd: f64,
        daily_power_cost_usd: f64,
        daily_profit_usd: f64,
        break_even_electricity_usd_kwh: Option<f64>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            daily_revenue_usd: non_negative("dailyRevenueUsd", daily_revenue_usd)?,
            daily_power_cost_usd: non_negative("dailyPowerCostUsd", daily_power_cost_usd)?,
            daily_profit_usd: finite("dailyProfitUsd", daily_profit_usd)?,
            break_even_electricity_usd_kwh,
        })
    }
}

/// Catalog entry for one ASIC model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSpec {
    pub model: String,
    pub hashrate_ths: f64,
    pub power_watts: u32,
    pub efficiency_j_th: f64,
    pub release_year: Option<u16>,
}

impl HardwareSpec {
    pub fn new(
        model: impl Into<String>,
        hashrate_ths: f64,
        power_watts: u32,
        efficiency_j_th: f64,
        release_year: Option<u16>,
    ) -> Result<Self, DomainError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(DomainError::Empty {
                field: "models.model",
            });
        }
        Ok(Self {
            model,
            hashrate_ths: positive("models.hashrateThs", hashrate_ths)?,
            power_watts,
            efficiency_j_th: positive("models.efficiencyJTh", efficiency_j_th)?,
            release_year,
        })
    }
}

/// Batch of hardware lookups, one entry per recognized model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSpecs {
    pub models: Vec<HardwareSpec>,
}
