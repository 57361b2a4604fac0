//! One-shot fetch of the configured feed; prints the dashboard as JSON, or as
//! a plain per-tab listing with `--plain`.

use activity_dashboard::config::DashboardConfig;
use activity_dashboard::feed::HttpFeedSource;
use activity_dashboard::logging::init_tracing;
use activity_dashboard::Dashboard;
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("warn");

    let plain = std::env::args().skip(1).any(|a| a == "--plain");

    let cfg = DashboardConfig::load_default()?;
    let source = HttpFeedSource::from_config(&cfg)?;

    // Ctrl-C aborts the in-flight request.
    let cancel = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let feed = source
        .fetch_with_cancel(cancel)
        .await
        .with_context(|| format!("fetching {}", source.url()))?;

    let dashboard = Dashboard::from_feed(&feed);
    if !plain {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("Workflows ({})", dashboard.workflows.len());
    for wf in &dashboard.workflows {
        println!("  {}  {}  {}  {}", wf.id, wf.name, wf.issue_key, wf.pull_request);
    }
    for tab in &dashboard.tabs {
        println!();
        println!("{}", tab.title);
        for row in &tab.rows {
            println!(
                "  {}  {:<8} {:<20} {}",
                row.when,
                row.provider.as_str(),
                row.entity,
                row.summary.as_deref().unwrap_or("—")
            );
            if let Some(j) = &row.journey {
                println!("      {j}");
            }
        }
    }
    Ok(())
}
