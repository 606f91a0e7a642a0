//! Prometheus gauges mirroring the dashboard, served by `export`.

use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusHandle;
use poem::{Response, handler};

use crate::{clock::ClockReading, format::to_tokens, snapshot::ContractSnapshot};

pub fn describe() {
    describe_gauge!("burn_dashboard_total_burned", "Tokens burned so far");
    describe_gauge!("burn_dashboard_pending_burn", "Tokens currently eligible to burn");
    describe_gauge!("burn_dashboard_burn_rate_per_hour", "Tokens accruing per hour");
    describe_gauge!("burn_dashboard_caller_reward", "Reward paid per burn call");
    describe_gauge!("burn_dashboard_contract_balance", "Tokens held by the burner");
    describe_gauge!("burn_dashboard_burn_calls", "Number of burn calls");
    describe_gauge!(
        "burn_dashboard_burns_enabled",
        "Whether burns are enabled (1) or paused (0)"
    );
    describe_gauge!(
        "burn_dashboard_seconds_since_last_burn",
        "Seconds since the last on-chain burn"
    );
    describe_gauge!("burn_dashboard_price_usd", "Last fetched USD price per token");
    describe_counter!(
        "burn_dashboard_errors",
        "Number of errors encountered while fetching dashboard data"
    );
}

/// Publishes the fields that were read. Missing reads leave the gauge as is.
pub fn record_snapshot(snapshot: &ContractSnapshot) {
    let amounts = [
        ("burn_dashboard_total_burned", snapshot.total_burned),
        ("burn_dashboard_pending_burn", snapshot.pending_burn_amount),
        ("burn_dashboard_burn_rate_per_hour", snapshot.burn_rate_per_hour),
        ("burn_dashboard_caller_reward", snapshot.caller_reward),
        ("burn_dashboard_contract_balance", snapshot.contract_balance),
    ];
    for (name, value) in amounts {
        if let Some(value) = value {
            gauge!(name).set(to_tokens(value));
        }
    }
    if let Some(calls) = snapshot.total_burn_calls {
        gauge!("burn_dashboard_burn_calls").set(calls.saturating_to::<u64>() as f64);
    }
    if let Some(enabled) = snapshot.burns_enabled {
        gauge!("burn_dashboard_burns_enabled").set(if enabled { 1.0 } else { 0.0 });
    }
}

pub fn record_clock(reading: ClockReading) {
    if let Some(elapsed) = reading.elapsed {
        gauge!("burn_dashboard_seconds_since_last_burn").set(elapsed as f64);
    }
}

#[handler]
pub async fn prometheus_metrics(handle: poem::web::Data<&PrometheusHandle>) -> Response {
    let metrics = handle.render();
    Response::builder()
        .header("content-type", "text/plain")
        .body(metrics)
}
