// src/pipeline/mod.rs
//! Event shaping pipeline:
//! events -> groups -> {labels, latest rows (+ journey)} -> type buckets.
//!
//! Everything here is a pure function of the event slice. Missing optional
//! fields switch off only what depends on them.

pub mod buckets;
pub mod entity_key;
pub mod grouper;
pub mod journey;
pub mod labels;
pub mod latest;
pub mod summary;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::feed::types::Event;

pub use buckets::{bucket_by_type, TypeBucket};
pub use entity_key::{entity_key, event_key, EntityKey};
pub use grouper::{group_events, EntityGroup, EntityGroups};
pub use journey::{build_journey, Journey};
pub use labels::aggregate_labels;
pub use latest::{latest_rows, LatestRow};

/// Type-bucketed "latest per entity" view plus the label union per entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventsView<'a> {
    pub buckets: Vec<TypeBucket<'a>>,
    pub labels: BTreeMap<EntityKey, Vec<String>>,
}

impl<'a> EventsView<'a> {
    pub fn labels_for(&self, key: &EntityKey) -> &[String] {
        self.labels.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn bucket(&self, event_type: crate::feed::types::EventType) -> Option<&TypeBucket<'a>> {
        self.buckets.iter().find(|b| b.event_type == event_type)
    }

    pub fn entity_count(&self) -> usize {
        self.buckets.iter().map(|b| b.rows.len()).sum()
    }
}

/// Run the whole pipeline over a feed's events.
pub fn build_view(events: &[Event]) -> EventsView<'_> {
    let groups = group_events(events);
    let labels = aggregate_labels(events);
    let buckets = bucket_by_type(latest_rows(&groups));
    tracing::debug!(
        target: "pipeline",
        events = events.len(),
        entities = groups.len(),
        buckets = buckets.len(),
        "events view built"
    );
    EventsView { buckets, labels }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::feed::types::{EventType, Payload};

    #[test]
    fn build_view_end_to_end() {
        let events = vec![
            ev_with(
                "1",
                "2025-08-01T10:00:00Z",
                EventType::IssueCreated,
                issue("BOT-1"),
                Payload {
                    labels_added: vec!["bug".into()],
                    ..Payload::default()
                },
            ),
            ev(
                "2",
                "2025-08-01T11:00:00Z",
                EventType::PrOpened,
                pull_request("acme", "api", 1),
            ),
            ev(
                "3",
                "2025-08-01T12:00:00Z",
                EventType::IssueClosed,
                issue("BOT-1"),
            ),
        ];
        let view = build_view(&events);
        assert_eq!(view.entity_count(), 2);
        assert_eq!(view.labels_for(&"linear:issue:BOT-1".into()), ["bug".to_string()]);
        assert!(view.labels_for(&"github:pull_request:acme/api#1".into()).is_empty());

        let closed = view.bucket(EventType::IssueClosed).unwrap();
        assert_eq!(closed.rows[0].journey.as_ref().unwrap().to_string(), "Created → Closed");
        assert!(view.bucket(EventType::PrMerged).is_none());
    }

    #[test]
    fn empty_feed_gives_empty_view() {
        let view = build_view(&[]);
        assert!(view.buckets.is_empty());
        assert!(view.labels.is_empty());
    }
}
