// src/pipeline/grouper.rs
use std::collections::HashMap;

use crate::feed::types::Event;

use super::entity_key::{event_key, EntityKey};

/// Events about one logical entity, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityGroup<'a> {
    pub key: EntityKey,
    pub events: Vec<&'a Event>,
}

impl<'a> EntityGroup<'a> {
    /// Chronologically last event (ties: the later one in feed order).
    pub fn latest(&self) -> Option<&'a Event> {
        self.events.last().copied()
    }
}

/// Groups in first-seen order, with lookup by key.
#[derive(Debug, Clone, Default)]
pub struct EntityGroups<'a> {
    groups: Vec<EntityGroup<'a>>,
    index: HashMap<EntityKey, usize>,
}

impl<'a> EntityGroups<'a> {
    pub fn get(&self, key: &EntityKey) -> Option<&EntityGroup<'a>> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityGroup<'a>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Partition events by entity key and sort each group by timestamp.
///
/// Unparsable timestamps rank before every parsable one. The sort is stable,
/// so equal timestamps keep feed order.
pub fn group_events(events: &[Event]) -> EntityGroups<'_> {
    let mut out = EntityGroups::default();
    for ev in events {
        let Some(key) = event_key(ev) else {
            continue;
        };
        match out.index.get(&key) {
            Some(&i) => out.groups[i].events.push(ev),
            None => {
                out.index.insert(key.clone(), out.groups.len());
                out.groups.push(EntityGroup {
                    key,
                    events: vec![ev],
                });
            }
        }
    }
    for g in &mut out.groups {
        g.events.sort_by_cached_key(|e| e.timestamp());
    }
    out
}
