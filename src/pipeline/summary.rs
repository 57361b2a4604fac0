// src/pipeline/summary.rs
//! Per-row display helpers: one-line event summary, entity label, label chips.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::feed::detail::EventDetail;
use crate::feed::types::{EntityKind, EntityRef, Event};

/// One-line description of what an event carried. Each event type offers
/// its own fields, tried in a fixed order (free text, description, added
/// labels/reviewers/assignees, status, link, branch, review state); the first
/// present one wins.
pub fn summarize(ev: &Event) -> Option<String> {
    match ev.detail() {
        EventDetail::IssueCreated { description, labels } => {
            owned(description).or_else(|| listed("labels", labels))
        }
        EventDetail::IssueUpdated { text, description }
        | EventDetail::PrUpdated { text, description } => owned(text.or(description)),
        EventDetail::IssueCommented { text, labels } => {
            owned(text).or_else(|| listed("labels", labels))
        }
        EventDetail::IssueLabeled { labels } | EventDetail::PrLabeled { labels } => {
            listed("labels", labels)
        }
        EventDetail::IssueAssigned { assignees } => listed("assignees", assignees),
        EventDetail::PrReviewRequested { reviewers } => listed("reviewers", reviewers),
        EventDetail::IssueStatusChanged { status } => {
            status.map(|s| format!("status: {} \u{2192} {}", s.from, s.to))
        }
        EventDetail::IssueLinked { link } => link.map(|l| format!("{}: {}", l.link_type, l.url)),
        EventDetail::PrOpened { description, branch } => {
            owned(description).or_else(|| branch.map(|b| format!("branch: {b}")))
        }
        EventDetail::PrCommitPushed { text, branch } => {
            owned(text).or_else(|| branch.map(|b| format!("branch: {b}")))
        }
        EventDetail::PrDraft { branch } => branch.map(|b| format!("branch: {b}")),
        EventDetail::PrCommented { text } | EventDetail::CiCheckRun { text } => owned(text),
        EventDetail::PrReviewSubmitted { state, .. } => state.map(|s| format!("review: {s}")),
        EventDetail::IssueClosed
        | EventDetail::PrReadyForReview
        | EventDetail::PrMerged
        | EventDetail::PrClosed => None,
    }
}

fn owned(s: Option<&str>) -> Option<String> {
    s.map(str::to_string)
}

fn listed(what: &str, items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| format!("{what}: {}", items.join(", ")))
}

/// Human label for an entity: tracker key, `owner/repo#number`, or whatever
/// else it carries.
pub fn entity_label(e: &EntityRef) -> String {
    if e.kind == EntityKind::Issue {
        if let Some(key) = e.key() {
            return key.to_string();
        }
    }
    if e.kind == EntityKind::PullRequest {
        if let Some((owner, repo, number)) = e.repo_triple() {
            return format!("{owner}/{repo}#{number}");
        }
    }
    e.title()
        .or(e.id())
        .or(e.url())
        .unwrap_or(e.kind.as_str())
        .to_string()
}

pub const LABEL_PALETTE: [&str; 5] = ["primary", "secondary", "success", "warning", "danger"];

/// How many labels a row shows before collapsing the rest.
pub const MAX_SHOWN_LABELS: usize = 5;

/// Stable palette color for a label. Same label, same color, every run.
pub fn label_color(label: &str) -> &'static str {
    let digest = Sha256::digest(label.as_bytes());
    let n = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    LABEL_PALETTE[n as usize % LABEL_PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelChip {
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelChips {
    pub shown: Vec<LabelChip>,
    /// Labels beyond [`MAX_SHOWN_LABELS`], shown as a `+N` overflow.
    pub hidden: Vec<String>,
}

pub fn label_chips(labels: &[String]) -> LabelChips {
    let split = labels.len().min(MAX_SHOWN_LABELS);
    LabelChips {
        shown: labels[..split]
            .iter()
            .map(|l| LabelChip {
                label: l.clone(),
                color: label_color(l),
            })
            .collect(),
        hidden: labels[split..].to_vec(),
    }
}
