// src/pipeline/buckets.rs
use std::collections::BTreeMap;

use serde::Serialize;

use crate::feed::types::EventType;

use super::latest::LatestRow;

/// All entities whose newest event has type `event_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeBucket<'a> {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub rows: Vec<LatestRow<'a>>,
}

/// Partition rows by their latest event's type.
///
/// Within a bucket rows keep the order they came in (newest first when fed
/// from [`latest_rows`](super::latest::latest_rows)). Buckets are ordered by
/// the type's wire tag; types with no rows get no bucket.
pub fn bucket_by_type(rows: Vec<LatestRow<'_>>) -> Vec<TypeBucket<'_>> {
    let mut by_tag: BTreeMap<&'static str, TypeBucket<'_>> = BTreeMap::new();
    for row in rows {
        let t = row.latest.event_type;
        by_tag
            .entry(t.as_str())
            .or_insert_with(|| TypeBucket {
                event_type: t,
                rows: Vec::new(),
            })
            .rows
            .push(row);
    }
    by_tag.into_values().collect()
}
