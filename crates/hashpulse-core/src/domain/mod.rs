//! Validated domain types for upstream payloads.

mod models;

pub use models::{
    BlockSummary, BlocksPage, DifficultyStats, DomainError, FeeEstimates, HalvingStatus,
    HardwareSpec, HardwareSpecs, HashpriceQuote, HashrateHistory, HashratePoint, MempoolStats,
    NetworkHashrate, PoolDistribution, PoolShare, PriceTick, ProfitabilityEstimate,
};
