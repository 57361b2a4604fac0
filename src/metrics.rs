use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";

/// One-time metrics registration (so series show up on /metrics).
pub fn describe_feed_metrics() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_fetch_total", "Feed fetch attempts.");
        describe_counter!(
            "feed_fetch_errors_total",
            "Feed fetches that failed, labelled by error kind."
        );
        describe_counter!(
            "feed_validation_errors_total",
            "Feeds rejected for bad JSON, shape or schema version."
        );
        describe_counter!(
            "feed_cache_hits_total",
            "Requests served from a fresh snapshot."
        );
        describe_histogram!(
            "feed_fetch_ms",
            "Feed fetch + validation time in milliseconds."
        );
        describe_gauge!("feed_events", "Events in the current feed snapshot.");
        describe_gauge!("feed_entities", "Entities in the current feed snapshot.");
        describe_gauge!("feed_stale_secs", "Configured snapshot staleness window.");
    });
}

pub fn metrics_enabled() -> bool {
    std::env::var(ENV_METRICS_ENABLED)
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the staleness window.
    pub fn init(stale_secs: u64) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_feed_metrics();
        gauge!("feed_stale_secs").set(stale_secs as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
