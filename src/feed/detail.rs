//! Typed view over an event's loose payload: one variant per event type,
//! each carrying only the fields that type actually uses.

use super::types::{present, Event, EventType, Link, Payload, StatusTransition};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetail<'a> {
    IssueCreated { description: Option<&'a str>, labels: &'a [String] },
    IssueUpdated { text: Option<&'a str>, description: Option<&'a str> },
    IssueCommented { text: Option<&'a str>, labels: &'a [String] },
    IssueLabeled { labels: &'a [String] },
    IssueAssigned { assignees: &'a [String] },
    IssueStatusChanged { status: Option<&'a StatusTransition> },
    IssueLinked { link: Option<&'a Link> },
    IssueClosed,
    PrOpened { description: Option<&'a str>, branch: Option<&'a str> },
    PrDraft { branch: Option<&'a str> },
    PrReadyForReview,
    PrUpdated { text: Option<&'a str>, description: Option<&'a str> },
    PrLabeled { labels: &'a [String] },
    PrReviewRequested { reviewers: &'a [String] },
    /// `state` is the raw wire value, `outcome` its interpretation.
    PrReviewSubmitted { state: Option<&'a str>, outcome: ReviewOutcome },
    PrCommented { text: Option<&'a str> },
    PrCommitPushed { text: Option<&'a str>, branch: Option<&'a str> },
    CiCheckRun { text: Option<&'a str> },
    PrMerged,
    PrClosed,
}

impl<'a> EventDetail<'a> {
    /// Target status of a status change, when the producer filled it in.
    pub fn status_target(&self) -> Option<&'a str> {
        match self {
            EventDetail::IssueStatusChanged { status: Some(s) } => {
                Some(s.to.as_str()).filter(|to| !to.is_empty())
            }
            _ => None,
        }
    }
}

/// Outcome of a submitted review. The wire value is matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Approved,
    ChangesRequested,
    /// Any other state (commented, dismissed, missing, ...).
    Other,
}

impl ReviewOutcome {
    pub fn from_state(state: Option<&str>) -> Self {
        match state.map(str::to_lowercase).as_deref() {
            Some("approved") => ReviewOutcome::Approved,
            Some("changes_requested") => ReviewOutcome::ChangesRequested,
            _ => ReviewOutcome::Other,
        }
    }
}

static EMPTY: Payload = Payload {
    text: None,
    description: None,
    labels_added: Vec::new(),
    reviewers_added: Vec::new(),
    assignees_added: Vec::new(),
    branch: None,
    status: None,
    link: None,
    review: None,
};

impl Event {
    /// Interpret the payload according to this event's type.
    pub fn detail(&self) -> EventDetail<'_> {
        let p = self.payload.as_ref().unwrap_or(&EMPTY);
        match self.event_type {
            EventType::IssueCreated => EventDetail::IssueCreated {
                description: present(&p.description),
                labels: &p.labels_added,
            },
            EventType::IssueUpdated => EventDetail::IssueUpdated {
                text: present(&p.text),
                description: present(&p.description),
            },
            EventType::IssueCommented => EventDetail::IssueCommented {
                text: present(&p.text),
                labels: &p.labels_added,
            },
            EventType::IssueLabeled => EventDetail::IssueLabeled {
                labels: &p.labels_added,
            },
            EventType::IssueAssigned => EventDetail::IssueAssigned {
                assignees: &p.assignees_added,
            },
            EventType::IssueStatusChanged => EventDetail::IssueStatusChanged {
                status: p.status.as_ref(),
            },
            EventType::IssueLinked => EventDetail::IssueLinked {
                link: p.link.as_ref().filter(|l| !l.url.is_empty()),
            },
            EventType::IssueClosed => EventDetail::IssueClosed,
            EventType::PrOpened => EventDetail::PrOpened {
                description: present(&p.description),
                branch: present(&p.branch),
            },
            EventType::PrDraft => EventDetail::PrDraft {
                branch: present(&p.branch),
            },
            EventType::PrReadyForReview => EventDetail::PrReadyForReview,
            EventType::PrUpdated => EventDetail::PrUpdated {
                text: present(&p.text),
                description: present(&p.description),
            },
            EventType::PrLabeled => EventDetail::PrLabeled {
                labels: &p.labels_added,
            },
            EventType::PrReviewRequested => EventDetail::PrReviewRequested {
                reviewers: &p.reviewers_added,
            },
            EventType::PrReviewSubmitted => {
                let state = p.review.as_ref().map(|r| r.state.as_str()).filter(|s| !s.is_empty());
                EventDetail::PrReviewSubmitted {
                    state,
                    outcome: ReviewOutcome::from_state(state),
                }
            }
            EventType::PrCommented => EventDetail::PrCommented {
                text: present(&p.text),
            },
            EventType::PrCommitPushed => EventDetail::PrCommitPushed {
                text: present(&p.text),
                branch: present(&p.branch),
            },
            EventType::CiCheckRun => EventDetail::CiCheckRun {
                text: present(&p.text).or(present(&p.description)),
            },
            EventType::PrMerged => EventDetail::PrMerged,
            EventType::PrClosed => EventDetail::PrClosed,
        }
    }
}
