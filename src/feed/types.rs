// src/feed/types.rs
//! Wire model of the activity feed document (`data.json`).
//!
//! Field names follow the document's camelCase. Everything that the feed
//! producers may omit is `Option`/defaulted so per-record gaps never reject
//! the whole document; only structural problems (bad JSON, unknown enum tags,
//! wrong schema version) do.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Github,
    Linear,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Github => "github",
            Provider::Linear => "linear",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRef {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String, // e.g. "WF-BOT-5001"
    pub name: String,
    pub linear_issue_key: String, // e.g. "BOT-5001"
    pub github: GithubRef,
}

/// Who performed an event. `charlie` is the automated coding agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorType {
    #[serde(rename = "human")]
    Human,
    #[serde(rename = "charlie", alias = "agent")]
    Agent,
    #[serde(rename = "bot")]
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(rename = "type")]
    pub actor_type: ActorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Issue,
    PullRequest,
    Review,
    CheckRun,
    Commit,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Issue => "issue",
            EntityKind::PullRequest => "pull_request",
            EntityKind::Review => "review",
            EntityKind::CheckRun => "check_run",
            EntityKind::Commit => "commit",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polymorphic reference to the thing an event is about. Which fields are
/// present depends on kind and provider; none is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Issue-tracker key, e.g. `BOT-5001`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EntityRef {
    /// Bare reference of the given kind with no identifying fields.
    pub fn of_kind(kind: EntityKind) -> Self {
        Self {
            kind,
            provider: None,
            id: None,
            key: None,
            owner: None,
            repo: None,
            number: None,
            title: None,
            url: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        present(&self.id)
    }

    pub fn key(&self) -> Option<&str> {
        present(&self.key)
    }

    pub fn title(&self) -> Option<&str> {
        present(&self.title)
    }

    pub fn url(&self) -> Option<&str> {
        present(&self.url)
    }

    /// `(owner, repo, number)` when all three are present.
    pub fn repo_triple(&self) -> Option<(&str, &str, u64)> {
        Some((present(&self.owner)?, present(&self.repo)?, self.number?))
    }
}

/// Empty strings count as absent, same as a missing field.
pub(crate) fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// Closed set of event type tags found in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "issue.created")]
    IssueCreated,
    #[serde(rename = "issue.updated")]
    IssueUpdated,
    #[serde(rename = "issue.commented")]
    IssueCommented,
    #[serde(rename = "issue.labeled")]
    IssueLabeled,
    #[serde(rename = "issue.assigned")]
    IssueAssigned,
    #[serde(rename = "issue.status_changed")]
    IssueStatusChanged,
    #[serde(rename = "issue.linked")]
    IssueLinked,
    #[serde(rename = "issue.closed")]
    IssueClosed,
    #[serde(rename = "pr.opened")]
    PrOpened,
    #[serde(rename = "pr.draft")]
    PrDraft,
    #[serde(rename = "pr.ready_for_review")]
    PrReadyForReview,
    #[serde(rename = "pr.updated")]
    PrUpdated,
    #[serde(rename = "pr.labeled")]
    PrLabeled,
    #[serde(rename = "pr.review_requested")]
    PrReviewRequested,
    #[serde(rename = "pr.review_submitted")]
    PrReviewSubmitted,
    #[serde(rename = "pr.commented")]
    PrCommented,
    #[serde(rename = "pr.commit_pushed")]
    PrCommitPushed,
    #[serde(rename = "ci.check_run")]
    CiCheckRun,
    #[serde(rename = "pr.merged")]
    PrMerged,
    #[serde(rename = "pr.closed")]
    PrClosed,
}

impl EventType {
    pub const ALL: [EventType; 20] = [
        EventType::IssueCreated,
        EventType::IssueUpdated,
        EventType::IssueCommented,
        EventType::IssueLabeled,
        EventType::IssueAssigned,
        EventType::IssueStatusChanged,
        EventType::IssueLinked,
        EventType::IssueClosed,
        EventType::PrOpened,
        EventType::PrDraft,
        EventType::PrReadyForReview,
        EventType::PrUpdated,
        EventType::PrLabeled,
        EventType::PrReviewRequested,
        EventType::PrReviewSubmitted,
        EventType::PrCommented,
        EventType::PrCommitPushed,
        EventType::CiCheckRun,
        EventType::PrMerged,
        EventType::PrClosed,
    ];

    /// Wire tag, e.g. `"pr.review_submitted"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::IssueCreated => "issue.created",
            EventType::IssueUpdated => "issue.updated",
            EventType::IssueCommented => "issue.commented",
            EventType::IssueLabeled => "issue.labeled",
            EventType::IssueAssigned => "issue.assigned",
            EventType::IssueStatusChanged => "issue.status_changed",
            EventType::IssueLinked => "issue.linked",
            EventType::IssueClosed => "issue.closed",
            EventType::PrOpened => "pr.opened",
            EventType::PrDraft => "pr.draft",
            EventType::PrReadyForReview => "pr.ready_for_review",
            EventType::PrUpdated => "pr.updated",
            EventType::PrLabeled => "pr.labeled",
            EventType::PrReviewRequested => "pr.review_requested",
            EventType::PrReviewSubmitted => "pr.review_submitted",
            EventType::PrCommented => "pr.commented",
            EventType::PrCommitPushed => "pr.commit_pushed",
            EventType::CiCheckRun => "ci.check_run",
            EventType::PrMerged => "pr.merged",
            EventType::PrClosed => "pr.closed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "type", default)]
    pub link_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Loose payload as it appears on the wire. Interpreting it per event type is
/// done by [`crate::feed::detail::EventDetail`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels_added: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewers_added: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees_added: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusTransition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    /// ISO 8601 timestamp, kept verbatim. See [`Event::timestamp`].
    pub ts: String,
    pub provider: Provider,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub workflow_id: String,
    pub sequence: u64,
    pub actor: Actor,
    pub entity: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl Event {
    /// Parsed timestamp; `None` when `ts` is not a recognizable date.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_ts(&self.ts)
    }

    /// Labels this event adds (empty when the payload has none).
    pub fn labels_added(&self) -> &[String] {
        self.payload
            .as_ref()
            .map(|p| p.labels_added.as_slice())
            .unwrap_or_default()
    }
}

/// Parse an ISO timestamp. Accepts RFC 3339, offset-less date-times (taken as
/// UTC) and bare dates (midnight UTC).
pub fn parse_ts(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A validated feed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(deserialize_with = "whole_number")]
    pub schema_version: u32,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// JSON has one number type, so `1.0` is the same version as `1`.
fn whole_number<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let v = f64::deserialize(d)?;
    if v.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&v) {
        return Err(de::Error::custom(format!("expected a whole number, got {v}")));
    }
    Ok(v as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_tags_round_trip_through_from_str() {
        for t in EventType::ALL {
            assert_eq!(t.as_str().parse::<EventType>().unwrap(), t);
        }
        let err = "pr.reopened".parse::<EventType>().unwrap_err();
        assert_eq!(err, UnknownEventType("pr.reopened".into()));
        assert_eq!(err.to_string(), "unknown event type: pr.reopened");
    }

    #[test]
    fn serde_tag_matches_as_str() {
        let v = serde_json::to_value(EventType::PrReviewSubmitted).unwrap();
        assert_eq!(v, serde_json::json!("pr.review_submitted"));
        let k = serde_json::to_value(EntityKind::PullRequest).unwrap();
        assert_eq!(k, serde_json::json!("pull_request"));
    }

    #[test]
    fn parse_ts_variants() {
        assert!(parse_ts("2025-08-01T10:00:00Z").is_some());
        assert!(parse_ts("2025-08-01T10:00:00.123+02:00").is_some());
        assert!(parse_ts("2025-08-01T10:00:00").is_some());
        assert!(parse_ts("2025-08-01").is_some());
        assert!(parse_ts("yesterday").is_none());
        assert!(parse_ts("").is_none());
    }

    #[test]
    fn empty_strings_are_absent() {
        let mut e = EntityRef::of_kind(EntityKind::PullRequest);
        e.owner = Some("acme".into());
        e.repo = Some(String::new());
        e.number = Some(7);
        assert_eq!(e.repo_triple(), None);
        e.repo = Some("web".into());
        assert_eq!(e.repo_triple(), Some(("acme", "web", 7)));
    }

    #[test]
    fn actor_type_accepts_charlie() {
        let a: Actor = serde_json::from_str(
            r#"{"id":"a1","displayName":"Charlie","type":"charlie"}"#,
        )
        .unwrap();
        assert_eq!(a.actor_type, ActorType::Agent);
        assert!(a.handle.is_none());
    }
}
