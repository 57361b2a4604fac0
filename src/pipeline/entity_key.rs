// src/pipeline/entity_key.rs
//! Stable key for "the same logical thing" across events.
//!
//! Priority (first match wins):
//! 1. explicit `id`, verbatim
//! 2. pull request with owner/repo/number  -> `{provider}:pull_request:{owner}/{repo}#{number}`
//! 3. review with owner/repo/number        -> same key as its parent pull request
//! 4. issue with a tracker key             -> `{provider}:issue:{key}`
//! 5. url                                  -> `{provider}:{kind}:{url}`
//! 6. `{provider}:{kind}`
//!
//! Rule 6 is coarse: distinct entities of one kind/provider with no other
//! identifying field collapse into one group. Feed producers may rely on that.
//! URL is preferred over title since titles get edited.

use std::fmt;

use serde::Serialize;

use crate::feed::types::{EntityKind, EntityRef, Event, Provider};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        EntityKey(s.to_string())
    }
}

/// Derive the key for `entity` as seen on an event from `provider`.
///
/// `None` means the event takes no part in grouping. With the current rules
/// every entity gets at least the `{provider}:{kind}` fallback.
pub fn entity_key(entity: &EntityRef, provider: Provider) -> Option<EntityKey> {
    if let Some(id) = entity.id() {
        return Some(EntityKey(id.to_string()));
    }

    match (entity.kind, entity.repo_triple()) {
        (EntityKind::PullRequest | EntityKind::Review, Some((owner, repo, number))) => {
            return Some(EntityKey(format!(
                "{provider}:{}:{owner}/{repo}#{number}",
                EntityKind::PullRequest
            )));
        }
        _ => {}
    }

    if entity.kind == EntityKind::Issue {
        if let Some(key) = entity.key() {
            return Some(EntityKey(format!("{provider}:{}:{key}", entity.kind)));
        }
    }

    if let Some(url) = entity.url() {
        return Some(EntityKey(format!("{provider}:{}:{url}", entity.kind)));
    }

    Some(EntityKey(format!("{provider}:{}", entity.kind)))
}

/// Key of the entity an event is about.
pub fn event_key(ev: &Event) -> Option<EntityKey> {
    entity_key(&ev.entity, ev.provider)
}
