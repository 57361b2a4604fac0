// src/feed/validate.rs
use serde_json::Value;

use super::error::FeedError;
use super::types::Feed;

/// The only feed schema version this build understands.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Decode and validate a feed document.
///
/// The schema version is checked on the raw JSON before the typed decode, so a
/// document from a newer producer is reported as a version mismatch rather than
/// as whatever shape error it happens to trip first.
pub fn parse_feed(body: &[u8]) -> Result<Feed, FeedError> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|e| FeedError::Decode(e.to_string()))?;
    check_schema_version(&raw)?;
    serde_json::from_value(raw).map_err(|e| FeedError::Decode(e.to_string()))
}

fn check_schema_version(raw: &Value) -> Result<(), FeedError> {
    let version = match raw.get("schemaVersion") {
        Some(Value::Number(n)) => n,
        _ => return Err(FeedError::Validation("missing schemaVersion".into())),
    };
    // 1 and 1.0 are the same JSON number
    if version.as_f64() != Some(f64::from(CURRENT_SCHEMA_VERSION)) {
        return Err(FeedError::Validation(format!(
            "unexpected schemaVersion: {version}"
        )));
    }
    Ok(())
}
