//! dashboard.rs — owned, serializable shape the UI renders: a workflows table
//! and one tab per latest-event type.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::feed::links::{workflow_issue_url, workflow_pull_request_url};
use crate::feed::types::{EventType, Feed, Provider, Workflow};
use crate::pipeline::summary::{entity_label, label_chips, summarize, LabelChips};
use crate::pipeline::{build_view, LatestRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub workflows: Vec<WorkflowRow>,
    pub tabs: Vec<EventTab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowRow {
    pub id: String,
    pub name: String,
    pub issue_key: String,
    pub issue_url: String,
    /// `owner/repo#number`
    pub pull_request: String,
    pub pull_request_url: String,
}

impl From<&Workflow> for WorkflowRow {
    fn from(wf: &Workflow) -> Self {
        Self {
            id: wf.id.clone(),
            name: wf.name.clone(),
            issue_key: wf.linear_issue_key.clone(),
            issue_url: workflow_issue_url(wf),
            pull_request: format!(
                "{}/{}#{}",
                wf.github.owner, wf.github.repo, wf.github.pr_number
            ),
            pull_request_url: workflow_pull_request_url(wf),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTab {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// e.g. `pr.merged (3)`
    pub title: String,
    pub count: usize,
    pub rows: Vec<EntityRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRow {
    pub key: String,
    pub event_id: String,
    /// RFC 3339 in UTC, or the raw `ts` when it does not parse.
    pub when: String,
    pub provider: Provider,
    pub actor: String,
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_url: Option<String>,
    pub labels: LabelChips,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journey: Option<String>,
}

impl Dashboard {
    pub fn from_feed(feed: &Feed) -> Self {
        let view = build_view(&feed.events);
        let tabs = view
            .buckets
            .iter()
            .map(|b| EventTab {
                event_type: b.event_type,
                title: format!("{} ({})", b.event_type, b.rows.len()),
                count: b.rows.len(),
                rows: b
                    .rows
                    .iter()
                    .map(|r| entity_row(r, view.labels_for(&r.key)))
                    .collect(),
            })
            .collect();
        Self {
            workflows: feed.workflows.iter().map(WorkflowRow::from).collect(),
            tabs,
        }
    }

    pub fn tab(&self, event_type: EventType) -> Option<&EventTab> {
        self.tabs.iter().find(|t| t.event_type == event_type)
    }

    pub fn entity_count(&self) -> usize {
        self.tabs.iter().map(|t| t.count).sum()
    }
}

fn entity_row(row: &LatestRow<'_>, labels: &[String]) -> EntityRow {
    let ev = row.latest;
    EntityRow {
        key: row.key.to_string(),
        event_id: ev.id.clone(),
        when: ev
            .timestamp()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| ev.ts.clone()),
        provider: ev.provider,
        actor: ev.actor.display_name.clone(),
        entity: entity_label(&ev.entity),
        entity_url: ev.entity.url().map(str::to_string),
        labels: label_chips(labels),
        summary: summarize(ev),
        journey: row.journey.as_ref().map(ToString::to_string),
    }
}
