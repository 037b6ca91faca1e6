//! Shared fixtures for behavior-driven integration tests: a scripted
//! transport double and canned upstream payloads.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use serde_json::{json, Value};

pub use hashpulse_core::{
    aggregate::{AggregateError, AggregationReport, OverviewOptions},
    client::{BlocksQuery, HistoryRange, ProfitabilityQuery, StatsClient},
    config::{BudgetConfig, ClientConfig},
    error::{ErrorKind, FetchError},
    http_client::{HttpClient, HttpError, HttpRequest, HttpResponse},
    CircuitBreakerConfig,
};
pub use std::sync::Arc;

/// Transport double that serves queued responses per path and records every
/// request it sees. Unscripted requests fail as connection errors so a test
/// never silently hits the network.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    responses: Mutex<HashMap<String, VecDeque<Result<HttpResponse, HttpError>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, path: &str, response: Result<HttpResponse, HttpError>) {
        self.responses
            .lock()
            .expect("response store should not be poisoned")
            .entry(path.to_owned())
            .or_default()
            .push_back(response);
    }

    pub fn enqueue_json(&self, path: &str, body: Value) {
        self.enqueue(path, Ok(HttpResponse::ok_json(body.to_string())));
    }

    pub fn enqueue_status(&self, path: &str, status: u16) {
        self.enqueue(path, Ok(HttpResponse::with_status(status, "{}")));
    }

    pub fn enqueue_error(&self, path: &str, error: HttpError) {
        self.enqueue(path, Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.recorded_requests().len()
    }

    pub fn requests_to(&self, path: &str) -> usize {
        self.recorded_requests()
            .iter()
            .filter(|request| path_of(&request.url) == path)
            .count()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let path = path_of(&request.url).to_owned();
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);

        let response = self
            .responses
            .lock()
            .expect("response store should not be poisoned")
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(HttpError::new(format!("unscripted request to {path}"))));

        Box::pin(async move { response })
    }
}

fn path_of(url: &str) -> &str {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    let path_start = without_scheme.find('/').unwrap_or(without_scheme.len());
    let path = &without_scheme[path_start..];
    path.split('?').next().unwrap_or(path)
}

/// Client wired to a scripted transport with a generous request budget.
pub fn scripted_client(http: Arc<ScriptedHttpClient>) -> StatsClient {
    scripted_client_with(http, ClientConfig::default())
}

pub fn scripted_client_with(http: Arc<ScriptedHttpClient>, config: ClientConfig) -> StatsClient {
    let config = config.with_base_url("https://stats.test");
    StatsClient::with_http_client(config, http)
}

pub fn generous_budget() -> BudgetConfig {
    BudgetConfig {
        capacity: 50,
        refill_per_sec: 10.0,
    }
}

// ---------------------------------------------------------------------------
// Canned upstream payloads
// ---------------------------------------------------------------------------

pub fn hashrate_json() -> Value {
    json!({
        "currentHashrate": 748.5,
        "average30d": 748.2,
        "unit": "EH/s",
        "timestamp": 1_722_988_800,
    })
}

pub fn history_json() -> Value {
    json!({
        "unit": "EH/s",
        "samples": [
            { "date": "2026-07-01", "hashrate": 744.1 },
            { "date": "2026-07-02", "hashrate": 749.8 },
            { "date": "2026-07-03", "hashrate": 748.0 },
        ],
    })
}

pub fn difficulty_json() -> Value {
    json!({
        "difficulty": 9.8e13,
        "blocksUntilAdjustment": 1250,
        "estimatedChangePercent": 0.5,
        "lastChangePercent": -1.2,
        "nextAdjustmentEta": 1_723_852_800,
    })
}

pub fn mempool_json() -> Value {
    json!({
        "txCount": 3000,
        "vsizeMb": 12.4,
        "avgFeeRate": 4.0,
        "medianFeeRate": 3.2,
    })
}

pub fn fees_json() -> Value {
    json!({
        "fastest": 18.0,
        "halfHour": 12.0,
        "hour": 9.0,
        "economy": 4.0,
        "minimum": 1.0,
    })
}

pub fn blocks_json(page: u32) -> Value {
    json!({
        "page": page,
        "pageSize": 25,
        "blocks": [
            {
                "height": 856_000 + u64::from(page),
                "hash": "00000000000000000002f5e8a6bafd5c1ea47f9b6cbd3f3c70b7a0ecf6f7a001",
                "timestamp": 1_722_988_800,
                "txCount": 3121,
                "sizeBytes": 1_534_202,
                "totalFeesBtc": 0.233,
            },
        ],
    })
}

pub fn pools_json() -> Value {
    json!({
        "window": "24h",
        "pools": [
            { "name": "Foundry USA", "sharePercent": 28.3, "blocksFound": 43 },
            { "name": "AntPool", "sharePercent": 22.1, "blocksFound": 34 },
        ],
    })
}

pub fn price_json() -> Value {
    json!({
        "usd": 64_250.5,
        "change24hPercent": -1.8,
        "timestamp": 1_722_988_800,
    })
}

pub fn hashprice_json() -> Value {
    json!({
        "usdPerPhPerDay": 48.2,
        "btcPerPhPerDay": 0.00075,
    })
}

pub fn halving_json() -> Value {
    json!({
        "blocksRemaining": 104_000,
        "estimatedDate": "2028-03-14",
        "currentSubsidyBtc": 3.125,
        "nextSubsidyBtc": 1.5625,
    })
}

pub fn profitability_json() -> Value {
    json!({
        "dailyRevenueUsd": 5.78,
        "dailyPowerCostUsd": 4.68,
        "dailyProfitUsd": 1.10,
        "breakEvenElectricityUsdKwh": 0.074,
    })
}

pub fn hardware_json() -> Value {
    json!({
        "models": [
            {
                "model": "Antminer S19 Pro",
                "hashrateThs": 110.0,
                "powerWatts": 3250,
                "efficiencyJTh": 29.5,
                "releaseYear": 2020,
            },
        ],
    })
}
