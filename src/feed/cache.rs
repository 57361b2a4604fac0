// src/feed/cache.rs
//! Snapshot cache with a staleness window.
//!
//! A snapshot younger than `stale_after` is served as is. Older (or missing)
//! snapshots are replaced by one fetch; concurrent callers wait for that fetch
//! instead of starting their own. Failures go back to the caller and are not
//! cached, and the previous snapshot stays until a fetch succeeds.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use tokio::sync::Mutex;

use super::error::FeedError;
use super::source::FeedSource;
use super::types::Feed;
use crate::dashboard::Dashboard;

/// One validated feed plus everything derived from it. Derived data is
/// computed once, when the snapshot is created.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub feed: Feed,
    pub dashboard: Dashboard,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(feed: Feed) -> Self {
        let dashboard = Dashboard::from_feed(&feed);
        gauge!("feed_entities").set(dashboard.entity_count() as f64);
        Self {
            feed,
            dashboard,
            fetched_at: Utc::now(),
        }
    }
}

pub struct FeedCache {
    source: Box<dyn FeedSource>,
    stale_after: Duration,
    state: Mutex<Option<(Instant, Arc<Snapshot>)>>,
}

impl FeedCache {
    pub fn new(source: Box<dyn FeedSource>, stale_after: Duration) -> Self {
        Self {
            source,
            stale_after,
            state: Mutex::new(None),
        }
    }

    /// Current snapshot, refetching when stale.
    pub async fn get(&self) -> Result<Arc<Snapshot>, FeedError> {
        let mut state = self.state.lock().await;
        if let Some((at, snap)) = state.as_ref() {
            if at.elapsed() < self.stale_after {
                counter!("feed_cache_hits_total").increment(1);
                return Ok(Arc::clone(snap));
            }
        }
        let snap = self.fetch_snapshot().await?;
        *state = Some((Instant::now(), Arc::clone(&snap)));
        Ok(snap)
    }

    /// Fetch now, regardless of age.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, FeedError> {
        let mut state = self.state.lock().await;
        let snap = self.fetch_snapshot().await?;
        *state = Some((Instant::now(), Arc::clone(&snap)));
        Ok(snap)
    }

    async fn fetch_snapshot(&self) -> Result<Arc<Snapshot>, FeedError> {
        let feed = self.source.fetch().await?;
        tracing::debug!(
            target: "feed",
            source = self.source.name(),
            events = feed.events.len(),
            "new feed snapshot"
        );
        Ok(Arc::new(Snapshot::new(feed)))
    }
}
