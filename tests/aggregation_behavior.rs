//! Behavior-driven tests for composite fan-out aggregation.
//!
//! These tests verify HOW the aggregator degrades when parts of the upstream
//! are unavailable, and that a composite result is always renderable from
//! whatever subset of data arrived.

use hashpulse_tests::*;
use time::macros::date;

fn overview_fixture() -> Arc<ScriptedHttpClient> {
    let http = Arc::new(ScriptedHttpClient::new());
    http.enqueue_json("/v2.0/network/hashrate", hashrate_json());
    http.enqueue_json("/v1.0/network/difficulty", difficulty_json());
    http.enqueue_json("/v1.0/network/mempool", mempool_json());
    http.enqueue_json("/v2.0/market/price", price_json());
    http.enqueue_json("/v1.0/network/fees", fees_json());
    http.enqueue_json("/v1.0/blocks", blocks_json(1));
    http
}

// =============================================================================
// Graceful degradation
// =============================================================================

#[tokio::test]
async fn when_every_source_responds_the_report_is_complete() {
    // Given: a fully healthy upstream
    let http = overview_fixture();
    let client = scripted_client(http.clone());

    // When: a network overview fans out
    let report = client
        .network_overview(OverviewOptions::default())
        .await
        .expect("healthy overview succeeds");

    // Then: all six core sub-requests succeeded and none failed
    assert!(report.is_complete());
    assert_eq!(report.requested(), 6);
    for name in [
        "network_hashrate",
        "difficulty",
        "mempool",
        "bitcoin_price",
        "fee_estimates",
        "recent_blocks",
    ] {
        assert!(report.succeeded.contains_key(name), "{name} should succeed");
    }
}

#[tokio::test]
async fn when_one_source_fails_the_report_carries_the_rest() {
    // Given: a healthy upstream except for a price outage
    let http = Arc::new(ScriptedHttpClient::new());
    http.enqueue_json("/v2.0/network/hashrate", hashrate_json());
    http.enqueue_json("/v1.0/network/difficulty", difficulty_json());
    http.enqueue_json("/v1.0/network/mempool", mempool_json());
    http.enqueue_error("/v2.0/market/price", HttpError::timeout("request timed out"));
    http.enqueue_json("/v1.0/network/fees", fees_json());
    http.enqueue_json("/v1.0/blocks", blocks_json(1));
    let client = scripted_client(http);

    // When: the overview fans out
    let report = client
        .network_overview(OverviewOptions::default())
        .await
        .expect("partial failure still yields a report");

    // Then: one failure is annotated, five successes are usable
    assert_eq!(report.succeeded.len(), 5);
    assert_eq!(report.failed.len(), 1);
    let reason = report.failed.get("bitcoin_price").expect("price is annotated");
    assert!(reason.contains("timed out"));
    assert!(report.succeeded.contains_key("mempool"));
}

#[tokio::test]
async fn when_all_critical_sources_fail_the_aggregation_escalates() {
    // Given: hashrate, difficulty, and mempool all down; market data fine
    let http = Arc::new(ScriptedHttpClient::new());
    http.enqueue_status("/v2.0/network/hashrate", 502);
    http.enqueue_status("/v1.0/network/difficulty", 502);
    http.enqueue_error("/v1.0/network/mempool", HttpError::new("connection refused"));
    http.enqueue_json("/v2.0/market/price", price_json());
    http.enqueue_json("/v1.0/network/fees", fees_json());
    http.enqueue_json("/v1.0/blocks", blocks_json(1));
    let client = scripted_client(http);

    // When / Then: the dedicated hard-failure condition is signaled
    let error = client
        .network_overview(OverviewOptions::default())
        .await
        .expect_err("losing every critical source must escalate");
    let AggregateError::CriticalEndpointsFailed { failed } = error;
    assert!(failed.contains_key("network_hashrate"));
    assert!(failed.contains_key("difficulty"));
    assert!(failed.contains_key("mempool"));
}

#[tokio::test]
async fn when_one_critical_source_survives_the_report_is_returned() {
    // Given: only mempool among the critical set is healthy
    let http = Arc::new(ScriptedHttpClient::new());
    http.enqueue_status("/v2.0/network/hashrate", 500);
    http.enqueue_status("/v1.0/network/difficulty", 500);
    http.enqueue_json("/v1.0/network/mempool", mempool_json());
    http.enqueue_json("/v2.0/market/price", price_json());
    http.enqueue_json("/v1.0/network/fees", fees_json());
    http.enqueue_json("/v1.0/blocks", blocks_json(1));
    let client = scripted_client(http);

    // When / Then: degraded but alive
    let report = client
        .network_overview(OverviewOptions::default())
        .await
        .expect("one surviving critical source keeps the report alive");
    assert_eq!(report.failed.len(), 2);
    assert!(report.succeeded.contains_key("mempool"));
}

// =============================================================================
// Optional sub-requests
// =============================================================================

#[tokio::test]
async fn when_optional_detail_is_not_requested_it_is_never_fetched() {
    // Given: a healthy core upstream with nothing scripted for extras
    let http = overview_fixture();
    let client = scripted_client(http.clone());

    // When: the default overview (no history, no pools) runs
    let report = client
        .network_overview(OverviewOptions::default())
        .await
        .expect("overview succeeds");

    // Then: the optional resources were neither fetched nor reported failed
    assert_eq!(http.requests_to("/v2.0/network/hashrate/history"), 0);
    assert_eq!(http.requests_to("/v1.0/pools"), 0);
    assert!(!report.failed.contains_key("hashrate_history"));
    assert!(!report.failed.contains_key("pool_distribution"));
    assert_eq!(report.requested(), 6);
}

#[tokio::test]
async fn when_optional_detail_is_requested_it_joins_the_fanout() {
    // Given: the core fixture plus history and pool payloads
    let http = overview_fixture();
    http.enqueue_json("/v2.0/network/hashrate/history", history_json());
    http.enqueue_json("/v1.0/pools", pools_json());
    let client = scripted_client(http.clone());

    let range = HistoryRange::new(date!(2026 - 07 - 01), date!(2026 - 07 - 31)).expect("range");
    let options = OverviewOptions {
        history: Some(range),
        include_pools: true,
    };

    // When: the expanded overview runs
    let report = client.network_overview(options).await.expect("overview succeeds");

    // Then: the optional payloads are part of the report
    assert_eq!(report.requested(), 8);
    assert!(report.succeeded.contains_key("hashrate_history"));
    assert!(report.succeeded.contains_key("pool_distribution"));
    assert_eq!(http.requests_to("/v2.0/network/hashrate/history"), 1);
}

// =============================================================================
// Market snapshot
// =============================================================================

#[tokio::test]
async fn market_snapshot_tolerates_best_effort_failures() {
    // Given: price healthy, hashprice down
    let http = Arc::new(ScriptedHttpClient::new());
    http.enqueue_json("/v2.0/market/price", price_json());
    http.enqueue_status("/v2.0/market/hashprice", 503);
    http.enqueue_json("/v1.0/network/fees", fees_json());
    let client = scripted_client(http);

    // When / Then
    let report = client.market_snapshot().await.expect("snapshot survives");
    assert!(report.succeeded.contains_key("bitcoin_price"));
    assert!(report.failed.contains_key("hashprice"));
}

#[tokio::test]
async fn market_snapshot_escalates_when_price_is_lost() {
    // Given: the single critical source is down
    let http = Arc::new(ScriptedHttpClient::new());
    http.enqueue_error("/v2.0/market/price", HttpError::new("connection reset"));
    http.enqueue_json("/v2.0/market/hashprice", hashprice_json());
    http.enqueue_json("/v1.0/network/fees", fees_json());
    let client = scripted_client(http);

    // When / Then
    let error = client
        .market_snapshot()
        .await
        .expect_err("losing the only critical source must escalate");
    let AggregateError::CriticalEndpointsFailed { failed } = error;
    assert!(failed.contains_key("bitcoin_price"));
}

// =============================================================================
// Aggregation feeds health scoring
// =============================================================================

#[tokio::test]
async fn overview_payloads_retype_and_score_cleanly() {
    use hashpulse_core::{score_network_health, DifficultyStats, MempoolStats, NetworkHashrate};

    // Given: a healthy overview report
    let http = overview_fixture();
    let client = scripted_client(http);
    let report = client
        .network_overview(OverviewOptions::default())
        .await
        .expect("overview succeeds");

    // When: the typed payloads feed the scorer
    let hashrate: Option<NetworkHashrate> = report.payload("network_hashrate");
    let mempool: Option<MempoolStats> = report.payload("mempool");
    let difficulty: Option<DifficultyStats> = report.payload("difficulty");
    let health = score_network_health(
        hashrate.as_ref(),
        mempool.as_ref(),
        difficulty.as_ref(),
        None,
    );

    // Then: the quiet fixture scores a perfect hundred with no alerts
    assert_eq!(health.breakdown.total, 100);
    assert!(health.alerts.is_empty());
}
