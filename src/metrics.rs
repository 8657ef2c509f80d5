use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register();
    Ok(handle)
}

/// Build a handle without installing it as the global recorder, for tests
/// that construct several routers in one process.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

fn register() {
    // Pre-register counters so they appear even before the first increment.
    counter!("bets_settled_total").absolute(0);
    counter!("settlement_rejected_total").absolute(0);
    counter!("ranking_tipsters_excluded_total").absolute(0);
    counter!("reports_sent_total").absolute(0);
    counter!("reports_failed_total").absolute(0);
    counter!("session_expired_total").absolute(0);

    histogram!("leaderboard_build_seconds").record(0.0);
}
