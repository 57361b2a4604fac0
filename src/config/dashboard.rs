// src/config/dashboard.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const ENV_FEED_URL: &str = "ACTIVITY_FEED_URL";
pub const ENV_STALE_SECS: &str = "ACTIVITY_FEED_STALE_SECS";
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

/// Raw gist document. No revision pinned, so gist edits show up on the next fetch.
pub const DEFAULT_FEED_URL: &str =
    "https://gist.githubusercontent.com/rileytomasek/0ca22aaf6df4985befd6779e37dab1a2/raw/data.json";

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}
fn default_stale_secs() -> u64 {
    60
}
fn default_connect_timeout_secs() -> u64 {
    4
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    "activity-dashboard/0.1".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// How long a fetched snapshot is served before the next request refetches.
    #[serde(default = "default_stale_secs")]
    pub stale_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            stale_secs: default_stale_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit path. TOML or JSON, picked by extension with a
    /// content-based fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing dashboard config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $DASHBOARD_CONFIG_PATH (must exist)
    /// 2) config/dashboard.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if p.exists() {
                Self::load_from(&p)?
            } else {
                Self::default()
            }
        };
        Ok(base.with_env_overrides().sanitized())
    }

    /// `ACTIVITY_FEED_URL` / `ACTIVITY_FEED_STALE_SECS` win over the file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_FEED_URL) {
            self.feed_url = url;
        }
        if let Some(secs) = std::env::var(ENV_STALE_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            self.stale_secs = secs;
        }
        self
    }

    /// Replace empty or out-of-range values with defaults.
    pub fn sanitized(mut self) -> Self {
        self.feed_url = self.feed_url.trim().to_string();
        if self.feed_url.is_empty() {
            self.feed_url = default_feed_url();
        }
        if !(1..=120).contains(&self.connect_timeout_secs) {
            self.connect_timeout_secs = default_connect_timeout_secs();
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        if self.stale_secs > 86_400 {
            self.stale_secs = default_stale_secs();
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<DashboardConfig> {
    if hint_ext == "json" || s.trim_start().starts_with('{') {
        return serde_json::from_str(s).map_err(Into::into);
    }
    toml::from_str(s).map_err(Into::into)
}
