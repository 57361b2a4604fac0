// src/feed/source.rs
use async_trait::async_trait;

use super::error::FeedError;
use super::types::Feed;
use super::validate::parse_feed;

/// Anything that can produce a validated feed snapshot.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Feed, FeedError>;
    fn name(&self) -> &'static str;
}

/// Serves a feed document held in memory. Goes through the same validation
/// as the HTTP source, so a bad fixture fails the same way a bad gist would.
pub struct FixtureFeedSource {
    pub content: String,
}

impl FixtureFeedSource {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

#[async_trait]
impl FeedSource for FixtureFeedSource {
    async fn fetch(&self) -> Result<Feed, FeedError> {
        parse_feed(self.content.as_bytes())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
