// src/feed/client.rs
//! HTTP feed source. One GET per fetch, no retries: a failure is reported to
//! the caller, which decides whether to ask again.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, gauge, histogram};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tracing::{debug, info, warn};

use super::error::FeedError;
use super::source::FeedSource;
use super::types::Feed;
use super::validate::parse_feed;
use crate::config::DashboardConfig;

pub struct HttpFeedSource {
    http: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(
        url: impl Into<String>,
        connect_timeout: Duration,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn from_config(cfg: &DashboardConfig) -> Result<Self, FeedError> {
        Self::new(
            cfg.feed_url.clone(),
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.request_timeout_secs),
            &cfg.user_agent,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and validate the feed.
    pub async fn fetch_feed(&self) -> Result<Feed, FeedError> {
        crate::metrics::describe_feed_metrics();
        counter!("feed_fetch_total").increment(1);
        let t0 = Instant::now();

        let res = self.fetch_inner().await;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("feed_fetch_ms").record(ms);
        match &res {
            Ok(feed) => {
                gauge!("feed_events").set(feed.events.len() as f64);
                info!(
                    target: "feed",
                    url = %self.url,
                    events = feed.events.len(),
                    workflows = feed.workflows.len(),
                    elapsed_ms = ms as u64,
                    "feed fetched"
                );
            }
            Err(e) => {
                counter!("feed_fetch_errors_total", "kind" => e.kind()).increment(1);
                if e.is_validation() {
                    counter!("feed_validation_errors_total").increment(1);
                }
                warn!(target: "feed", url = %self.url, kind = e.kind(), error = %e, "feed fetch failed");
            }
        }
        res
    }

    /// Like [`fetch_feed`](Self::fetch_feed), but gives up as soon as `cancel`
    /// resolves. The in-flight request is dropped, which aborts it.
    pub async fn fetch_with_cancel<C>(&self, cancel: C) -> Result<Feed, FeedError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!(target: "feed", url = %self.url, "feed fetch cancelled");
                Err(FeedError::Cancelled)
            }
            res = self.fetch_feed() => res,
        }
    }

    async fn fetch_inner(&self) -> Result<Feed, FeedError> {
        debug!(target: "feed", url = %self.url, "fetching feed");
        let resp = self
            .http
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = resp.bytes().await?;
        parse_feed(&body)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<Feed, FeedError> {
        self.fetch_feed().await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
