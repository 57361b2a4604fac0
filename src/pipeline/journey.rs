// src/pipeline/journey.rs
//! Compact "how did this entity get here" summary, e.g.
//! `Created → Todo → In-Progress → Closed` for an issue or
//! `Opened → Ready for review → Approved → Merged` for a pull request.

use std::fmt;

use serde::Serialize;

use crate::feed::detail::{EventDetail, ReviewOutcome};
use crate::feed::types::Event;

pub const JOURNEY_SEPARATOR: &str = " \u{2192} ";

/// Ordered milestones, never two equal ones in a row, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    steps: Vec<String>,
}

impl Journey {
    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.steps.join(JOURNEY_SEPARATOR))
    }
}

/// Milestone label for one event, if its type is a milestone at all.
/// Comments, labels, pushes, check runs and generic updates are activity,
/// not milestones.
fn milestone<'a>(detail: &EventDetail<'a>) -> Option<&'a str> {
    let label = match detail {
        EventDetail::IssueCreated { .. } => "Created",
        EventDetail::IssueStatusChanged { .. } => return detail.status_target(),
        EventDetail::IssueClosed => "Closed",

        EventDetail::PrOpened { .. } => "Opened",
        EventDetail::PrDraft { .. } => "Draft",
        EventDetail::PrReadyForReview => "Ready for review",
        EventDetail::PrReviewRequested { .. } => "Review requested",
        EventDetail::PrReviewSubmitted { outcome, .. } => match outcome {
            ReviewOutcome::Approved => "Approved",
            ReviewOutcome::ChangesRequested => "Changes requested",
            ReviewOutcome::Other => "Reviewed",
        },
        EventDetail::PrMerged => "Merged",
        EventDetail::PrClosed => "Closed",

        _ => return None,
    };
    Some(label)
}

/// Replay an entity's events (oldest first) into a journey.
///
/// Events whose entity kind differs from the first event's are skipped, so a
/// mis-grouped event cannot inject foreign milestones. Only consecutive
/// repeats collapse: `Todo → In-Progress → Todo` stays as is.
pub fn build_journey(events: &[&Event]) -> Option<Journey> {
    let kind = events.first()?.entity.kind;
    let mut steps: Vec<String> = Vec::new();
    for ev in events.iter().filter(|e| e.entity.kind == kind) {
        let Some(step) = milestone(&ev.detail()) else {
            continue;
        };
        if steps.last().is_some_and(|last| last == step) {
            continue;
        }
        steps.push(step.to_string());
    }
    (!steps.is_empty()).then_some(Journey { steps })
}
