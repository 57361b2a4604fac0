// src/pipeline/labels.rs
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::feed::types::Event;

use super::entity_key::{event_key, EntityKey};

/// Union of every label ever added to each entity, deduped and sorted
/// ascending in [`label_order`].
///
/// The feed only records additions, so this is "labels seen", not the
/// entity's current label set.
pub fn aggregate_labels(events: &[Event]) -> BTreeMap<EntityKey, Vec<String>> {
    let mut sets: BTreeMap<EntityKey, BTreeSet<&str>> = BTreeMap::new();
    for ev in events {
        let labels = ev.labels_added();
        if labels.is_empty() {
            continue;
        }
        let Some(key) = event_key(ev) else {
            continue;
        };
        sets.entry(key)
            .or_default()
            .extend(labels.iter().map(String::as_str));
    }
    sets.into_iter()
        .map(|(k, set)| {
            let mut list: Vec<String> = set.into_iter().map(str::to_string).collect();
            list.sort_by(|a, b| label_order(a, b));
            (k, list)
        })
        .collect()
}

/// Dictionary order: case-insensitive first, and on a tie the lowercase
/// spelling sorts before the uppercase one (`a < B < backend < P1`).
pub fn label_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::{EventType, Payload};
    use crate::pipeline::test_support::{ev_with, issue, pull_request};

    fn labels(v: &[&str]) -> Payload {
        Payload {
            labels_added: v.iter().map(|s| s.to_string()).collect(),
            ..Payload::default()
        }
    }

    #[test]
    fn union_is_deduped_and_sorted() {
        let events = vec![
            ev_with(
                "1",
                "2025-08-01T10:00:00Z",
                EventType::IssueLabeled,
                issue("BOT-1"),
                labels(&["bug", "backend"]),
            ),
            ev_with(
                "2",
                "2025-08-01T09:00:00Z",
                EventType::IssueCreated,
                issue("BOT-1"),
                labels(&["bug", "P1"]),
            ),
            ev_with(
                "3",
                "2025-08-01T11:00:00Z",
                EventType::PrLabeled,
                pull_request("acme", "api", 1),
                labels(&["ready"]),
            ),
        ];
        let out = aggregate_labels(&events);
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[&EntityKey::from("linear:issue:BOT-1")],
            vec!["backend".to_string(), "bug".into(), "P1".into()]
        );
        assert_eq!(
            out[&EntityKey::from("github:pull_request:acme/api#1")],
            vec!["ready".to_string()]
        );
    }

    #[test]
    fn mixed_case_labels_sort_like_a_dictionary() {
        let events = vec![ev_with(
            "1",
            "2025-08-01T10:00:00Z",
            EventType::IssueLabeled,
            issue("BOT-1"),
            labels(&["bug", "backend", "P1", "a", "B"]),
        )];
        let out = aggregate_labels(&events);
        assert_eq!(
            out[&EntityKey::from("linear:issue:BOT-1")],
            ["a", "B", "backend", "bug", "P1"]
        );
    }

    #[test]
    fn lowercase_wins_a_case_only_tie() {
        assert_eq!(label_order("a", "A"), Ordering::Less);
        assert_eq!(label_order("Bug", "bug"), Ordering::Greater);
        assert_eq!(label_order("bug", "bug"), Ordering::Equal);
    }

    #[test]
    fn events_without_labels_create_no_entry() {
        let events = vec![
            ev_with(
                "1",
                "2025-08-01T10:00:00Z",
                EventType::IssueCreated,
                issue("BOT-1"),
                Payload::default(),
            ),
            ev_with(
                "2",
                "2025-08-01T10:00:00Z",
                EventType::IssueLabeled,
                issue("BOT-2"),
                labels(&[]),
            ),
        ];
        assert!(aggregate_labels(&events).is_empty());
    }

    #[test]
    fn output_has_no_duplicates_and_is_ascending() {
        let events: Vec<_> = (0..10)
            .map(|i| {
                ev_with(
                    &i.to_string(),
                    "2025-08-01T10:00:00Z",
                    EventType::IssueLabeled,
                    issue("BOT-7"),
                    labels(&["z", "a", "m", if i % 2 == 0 { "A" } else { "b" }]),
                )
            })
            .collect();
        for list in aggregate_labels(&events).values() {
            for pair in list.windows(2) {
                assert_eq!(label_order(&pair[0], &pair[1]), Ordering::Less, "{list:?}");
            }
        }
    }
}
