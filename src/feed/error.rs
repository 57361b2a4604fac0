// src/feed/error.rs
use thiserror::Error;

/// Everything that can go wrong between "fetch the feed" and "have a validated
/// `Feed`". Per-record field gaps are not errors; they are tolerated downstream.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network failure, timeout, TLS, ...
    #[error("feed request failed: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status.
    #[error("failed to fetch feed ({status} {status_text})")]
    Status { status: u16, status_text: String },

    /// Body is not JSON, or does not match the feed shape.
    #[error("invalid feed body: {0}")]
    Decode(String),

    /// Schema version missing or unsupported. The feed is rejected wholesale.
    #[error("invalid feed: {0}")]
    Validation(String),

    /// Fetch was superseded or the consumer went away.
    #[error("feed fetch cancelled")]
    Cancelled,
}

impl FeedError {
    /// Short stable tag for API responses and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Transport(_) => "transport",
            FeedError::Status { .. } => "status",
            FeedError::Decode(_) => "decode",
            FeedError::Validation(_) => "validation",
            FeedError::Cancelled => "cancelled",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FeedError::Validation(_) | FeedError::Decode(_))
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Transport(e.to_string())
    }
}
