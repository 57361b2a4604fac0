// src/pipeline/latest.rs
use std::cmp::Reverse;

use serde::Serialize;

use crate::feed::types::Event;

use super::entity_key::EntityKey;
use super::grouper::EntityGroups;
use super::journey::{build_journey, Journey};

/// "Current state" of one entity: its newest event plus the journey so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRow<'a> {
    pub key: EntityKey,
    pub latest: &'a Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journey: Option<Journey>,
}

/// One row per group, newest first. Ties keep group (first-seen) order;
/// rows whose latest timestamp is unparsable go last.
pub fn latest_rows<'a>(groups: &EntityGroups<'a>) -> Vec<LatestRow<'a>> {
    let mut rows: Vec<LatestRow<'a>> = groups
        .iter()
        .filter_map(|g| {
            let latest = g.latest()?;
            Some(LatestRow {
                key: g.key.clone(),
                latest,
                journey: build_journey(&g.events),
            })
        })
        .collect();
    rows.sort_by_cached_key(|r| Reverse(r.latest.timestamp()));
    rows
}
