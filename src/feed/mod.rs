// src/feed/mod.rs
pub mod cache;
pub mod client;
pub mod detail;
pub mod error;
pub mod links;
pub mod source;
pub mod types;
pub mod validate;

pub use cache::{FeedCache, Snapshot};
pub use client::HttpFeedSource;
pub use error::FeedError;
pub use source::{FeedSource, FixtureFeedSource};
pub use types::{Feed, UnknownEventType};
pub use validate::{parse_feed, CURRENT_SCHEMA_VERSION};
