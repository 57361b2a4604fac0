// src/lib.rs
// Public library surface for the service binary, the CLI and integration tests.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod logging;
pub mod metrics;
pub mod pipeline;

use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tracing::info;

use crate::config::DashboardConfig;
use crate::feed::{FeedCache, HttpFeedSource};

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::dashboard::Dashboard;
pub use crate::feed::{parse_feed, Feed, FeedError};
pub use crate::pipeline::{build_view, EventsView};

/// Snapshot cache over the HTTP feed described by `cfg`.
pub fn http_cache(cfg: &DashboardConfig) -> anyhow::Result<FeedCache> {
    let source = HttpFeedSource::from_config(cfg).context("building feed http client")?;
    Ok(FeedCache::new(
        Box::new(source),
        Duration::from_secs(cfg.stale_secs),
    ))
}

/// Build the full router for `cfg`, including `/metrics` when
/// `METRICS_ENABLED=1`.
pub fn build_app(cfg: &DashboardConfig) -> anyhow::Result<Router> {
    let cache = http_cache(cfg)?;
    info!(
        target: "dashboard",
        feed_url = %cfg.feed_url,
        stale_secs = cfg.stale_secs,
        "dashboard router ready"
    );
    let mut router = create_router(AppState::new(cache));
    if crate::metrics::metrics_enabled() {
        let m = crate::metrics::Metrics::init(cfg.stale_secs)?;
        router = router.merge(m.router());
    }
    Ok(router)
}

/// Load config (file + env) and build the router.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = DashboardConfig::load_default()?;
    build_app(&cfg)
}
