//! Activity Dashboard — Binary Entrypoint
//! Boots the Axum HTTP server that serves the shaped activity feed as JSON.

use activity_dashboard::config::DashboardConfig;
use activity_dashboard::logging::init_tracing;
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up ACTIVITY_FEED_URL / DASHBOARD_CONFIG_PATH / METRICS_ENABLED.
    let _ = dotenvy::dotenv();

    init_tracing("activity_dashboard=info,feed=info,api=info,warn");

    let cfg = DashboardConfig::load_default()?;
    let router = activity_dashboard::build_app(&cfg)?;

    Ok(router.into())
}
