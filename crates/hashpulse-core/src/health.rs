//! Composite network health scoring.
//!
//! Pure functions over whatever subset of samples an aggregation managed to
//! collect. Missing inputs score as unknown or neutral instead of erroring,
//! mirroring the aggregator's partial-failure stance one level up.

use serde::Serialize;

use crate::domain::{DifficultyStats, HashrateHistory, MempoolStats, NetworkHashrate};

const HASHRATE_MAX: u32 = 40;
const MEMPOOL_MAX: u32 = 30;
const BLOCK_PRODUCTION_MAX: u32 = 30;

/// Blocks left in the 2016-block epoch above which the network has only just
/// adjusted, implying blocks are arriving slower than target.
const EPOCH_JUST_ADJUSTED: u32 = 1800;
/// Blocks left below which the next adjustment counts as imminent (~one day).
const EPOCH_IMMINENT: u32 = 144;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

/// Threshold-triggered observation, derived from raw samples independently
/// of the numeric score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthAlert {
    pub severity: AlertSeverity,
    pub metric: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthComponent {
    pub score: u32,
    pub max: u32,
}

/// Per-component scores. Each component satisfies `score <= max`; the total
/// is their sum and is bounded at 100 by construction (40 + 30 + 30).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthBreakdown {
    pub hashrate: HealthComponent,
    pub mempool: HealthComponent,
    pub block_production: HealthComponent,
    pub total: u32,
}

impl HealthBreakdown {
    pub fn components(&self) -> [(&'static str, HealthComponent); 3] {
        [
            ("hashrate", self.hashrate),
            ("mempool", self.mempool),
            ("block_production", self.block_production),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkHealth {
    pub breakdown: HealthBreakdown,
    pub alerts: Vec<HealthAlert>,
}

/// Score network health from whatever samples are available.
///
/// Deterministic and stateless: identical inputs always produce an identical
/// breakdown and alert list.
pub fn score_network_health(
    hashrate: Option<&NetworkHashrate>,
    mempool: Option<&MempoolStats>,
    difficulty: Option<&DifficultyStats>,
    history: Option<&HashrateHistory>,
) -> NetworkHealth {
    let hashrate_component = score_hashrate(hashrate, history);
    let mempool_component = score_mempool(mempool);
    let block_component = score_block_production(difficulty);

    let breakdown = HealthBreakdown {
        total: hashrate_component.score + mempool_component.score + block_component.score,
        hashrate: hashrate_component,
        mempool: mempool_component,
        block_production: block_component,
    };

    NetworkHealth {
        breakdown,
        alerts: collect_alerts(hashrate, mempool, difficulty),
    }
}

fn clamp_component(raw: i64, max: u32) -> HealthComponent {
    HealthComponent {
        score: raw.clamp(0, i64::from(max)) as u32,
        max,
    }
}

/// Hashrate stability, max 40. Unknown hashrate scores 0: the dominant
/// signal cannot be assumed healthy.
fn score_hashrate(
    hashrate: Option<&NetworkHashrate>,
    history: Option<&HashrateHistory>,
) -> HealthComponent {
    let Some(sample) = hashrate else {
        return HealthComponent {
            score: 0,
            max: HASHRATE_MAX,
        };
    };

    let deviation = sample.deviation_percent().abs();
    let penalty: i64 = if deviation > 15.0 {
        25
    } else if deviation > 10.0 {
        15
    } else if deviation > 5.0 {
        10
    } else if deviation > 2.0 {
        5
    } else {
        0
    };

    let bonus: i64 = match history {
        Some(window) if history_is_stable(window) => 5,
        _ => 0,
    };

    clamp_component(i64::from(HASHRATE_MAX) - penalty + bonus, HASHRATE_MAX)
}

/// A history window is stable when every sample deviates less than 2% from
/// the window's own mean.
fn history_is_stable(history: &HashrateHistory) -> bool {
    let mean = history.mean_ehs();
    if mean <= 0.0 {
        return false;
    }
    history
        .samples
        .iter()
        .all(|point| ((point.ehs - mean) / mean).abs() * 100.0 < 2.0)
}

/// Mempool health, max 30. Unknown mempool scores a neutral 15. Each metric
/// contributes its single highest matching bracket.
fn score_mempool(mempool: Option<&MempoolStats>) -> HealthComponent {
    let Some(sample) = mempool else {
        return HealthComponent {
            score: 15,
            max: MEMPOOL_MAX,
        };
    };

    let depth_penalty: i64 = if sample.tx_count > 100_000 {
        15
    } else if sample.tx_count > 50_000 {
        10
    } else if sample.tx_count > 20_000 {
        5
    } else if sample.tx_count > 10_000 {
        2
    } else {
        0
    };

    let fee_penalty: i64 = if sample.avg_fee_rate > 100.0 {
        10
    } else if sample.avg_fee_rate > 50.0 {
        8
    } else if sample.avg_fee_rate > 20.0 {
        5
    } else if sample.avg_fee_rate > 10.0 {
        2
    } else {
        0
    };

    clamp_component(
        i64::from(MEMPOOL_MAX) - depth_penalty - fee_penalty,
        MEMPOOL_MAX,
    )
}

/// Block production timing, max 30. Without a difficulty sample the
/// component is a fixed neutral 15.
fn score_block_production(difficulty: Option<&DifficultyStats>) -> HealthComponent {
    let Some(sample) = difficulty else {
        return HealthComponent {
            score: 15,
            max: BLOCK_PRODUCTION_MAX,
        };
    };

    let penalty: i64 = if sample.blocks_until_adjustment > EPOCH_JUST_ADJUSTED {
        10
    } else if sample.blocks_until_adjustment <= EPOCH_IMMINENT {
        let swing = sample.estimated_change_percent.abs();
        if swing > 10.0 {
            10
        } else if swing > 5.0 {
            5
        } else {
            0
        }
    } else {
        0
    };

    clamp_component(i64::from(BLOCK_PRODUCTION_MAX) - penalty, BLOCK_PRODUCTION_MAX)
}

fn collect_alerts(
    hashrate: Option<&NetworkHashrate>,
    mempool: Option<&MempoolStats>,
    difficulty: Option<&DifficultyStats>,
) -> Vec<HealthAlert> {
    let mut alerts = Vec::new();

    if let Some(sample) = hashrate {
        let drop = -sample.deviation_percent();
        if drop > 10.0 {
            alerts.push(HealthAlert {
                severity: AlertSeverity::Critical,
                metric: "hashrate",
                message: format!("hashrate {drop:.1}% below 30-sample average"),
            });
        } else if drop > 5.0 {
            alerts.push(HealthAlert {
                severity: AlertSeverity::Warning,
                metric: "hashrate",
                message: format!("hashrate {drop:.1}% below 30-sample average"),
            });
        }
    }

    if let Some(sample) = mempool {
        if sample.tx_count > 100_000 {
            alerts.push(HealthAlert {
                severity: AlertSeverity::Critical,
                metric: "mempool",
                message: format!("mempool congested: {} transactions waiting", sample.tx_count),
            });
        } else if sample.tx_count > 50_000 {
            alerts.push(HealthAlert {
                severity: AlertSeverity::Warning,
                metric: "mempool",
                message: format!("mempool backlog building: {} transactions", sample.tx_count),
            });
        }

        if sample.avg_fee_rate > 100.0 {
            alerts.push(HealthAlert {
                severity: AlertSeverity::Critical,
                metric: "fees",
                message: format!("average fee rate {:.0} sat/vB", sample.avg_fee_rate),
            });
        } else if sample.avg_fee_rate > 50.0 {
            alerts.push(HealthAlert {
                severity: AlertSeverity::Warning,
                metric: "fees",
                message: format!("average fee rate {:.0} sat/vB", sample.avg_fee_rate),
            });
        }
    }

    if let Some(sample) = difficulty {
        if sample.estimated_change_percent.abs() > 15.0 {
            alerts.push(HealthAlert {
                severity: AlertSeverity::Warning,
                metric: "difficulty",
                message: format!(
                    "predicted difficulty swing of {:.1}%",
                    sample.estimated_change_percent
                ),
            });
        }
    }

    alerts
}
