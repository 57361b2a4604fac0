// tests/pipeline_fixture.rs
//
// Whole-pipeline checks over a realistic two-workflow feed.

use activity_dashboard::feed::types::EventType;
use activity_dashboard::pipeline::{build_view, event_key, group_events, EntityKey};
use activity_dashboard::{parse_feed, Dashboard, Feed};

const FIXTURE: &str = include_str!("fixtures/feed.json");

fn feed() -> Feed {
    parse_feed(FIXTURE.as_bytes()).expect("fixture feed must validate")
}

fn key(s: &str) -> EntityKey {
    EntityKey::from(s)
}

#[test]
fn fixture_parses() {
    let f = feed();
    assert_eq!(f.schema_version, 1);
    assert_eq!(f.workflows.len(), 2);
    assert_eq!(f.events.len(), 18);
}

#[test]
fn groups_cover_every_event_in_time_order() {
    let f = feed();
    let groups = group_events(&f.events);
    assert_eq!(groups.len(), 5);

    let total: usize = groups.iter().map(|g| g.events.len()).sum();
    assert_eq!(total, f.events.len());

    for g in groups.iter() {
        for pair in g.events.windows(2) {
            assert!(pair[0].timestamp() <= pair[1].timestamp(), "group {}", g.key);
        }
        for e in &g.events {
            assert_eq!(event_key(e).as_ref(), Some(&g.key));
        }
    }

    // review event joins its pull request
    let api_pr = groups.get(&key("github:pull_request:acme/api#7")).unwrap();
    let ids: Vec<_> = api_pr.events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["ev-014", "ev-015", "ev-016", "ev-017"]);
}

#[test]
fn buckets_and_rows() {
    let f = feed();
    let view = build_view(&f.events);

    let tags: Vec<_> = view.buckets.iter().map(|b| b.event_type.as_str()).collect();
    assert_eq!(
        tags,
        [
            "ci.check_run",
            "issue.closed",
            "issue.commented",
            "pr.merged",
            "pr.review_submitted"
        ]
    );
    assert_eq!(view.entity_count(), 5);

    let closed = view.bucket(EventType::IssueClosed).unwrap();
    assert_eq!(closed.rows[0].key, key("linear:issue:BOT-5001"));
    assert_eq!(closed.rows[0].latest.id, "ev-012");
    assert_eq!(
        closed.rows[0].journey.as_ref().unwrap().to_string(),
        "Created → Todo → In Progress → Closed"
    );

    let merged = view.bucket(EventType::PrMerged).unwrap();
    assert_eq!(
        merged.rows[0].journey.as_ref().unwrap().to_string(),
        "Opened → Review requested → Approved → Merged"
    );

    // the review-kind event is skipped by the journey's kind guard
    let reviewed = view.bucket(EventType::PrReviewSubmitted).unwrap();
    assert_eq!(
        reviewed.rows[0].journey.as_ref().unwrap().to_string(),
        "Draft → Ready for review"
    );

    let check = view.bucket(EventType::CiCheckRun).unwrap();
    assert!(check.rows[0].journey.is_none());
}

#[test]
fn labels_are_unions_per_entity() {
    let f = feed();
    let view = build_view(&f.events);
    assert_eq!(view.labels_for(&key("linear:issue:BOT-5001")), ["auth", "bug"]);
    assert_eq!(
        view.labels_for(&key("github:pull_request:acme/web#42")),
        ["bug", "frontend", "needs-review"]
    );
    assert_eq!(
        view.labels_for(&key("linear:issue:BOT-5002")),
        ["api", "backend", "in-review"]
    );
    assert!(view.labels_for(&key("github:pull_request:acme/api#7")).is_empty());
}

#[test]
fn dashboard_rows_newest_first_overall() {
    let f = feed();
    let d = Dashboard::from_feed(&f);
    let mut rows: Vec<_> = d.tabs.iter().flat_map(|t| t.rows.iter()).collect();
    rows.sort_by(|a, b| b.when.cmp(&a.when));
    let ids: Vec<_> = rows.iter().map(|r| r.event_id.as_str()).collect();
    assert_eq!(ids, ["ev-018", "ev-017", "ev-012", "ev-011", "ev-009"]);

    let review_row = &d.tab(EventType::PrReviewSubmitted).unwrap().rows[0];
    assert_eq!(review_row.entity, "review");
    assert_eq!(review_row.summary.as_deref(), Some("review: changes_requested"));

    let commented = &d.tab(EventType::IssueCommented).unwrap().rows[0];
    assert_eq!(commented.summary.as_deref(), Some("Working on per-tenant limits."));
    assert_eq!(commented.journey.as_deref(), Some("Created"));
}

#[test]
fn pipeline_is_deterministic() {
    let f = feed();
    let a = serde_json::to_string(&Dashboard::from_feed(&f)).unwrap();
    let b = serde_json::to_string(&Dashboard::from_feed(&f)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn newer_schema_version_is_rejected() {
    let bumped = FIXTURE.replacen("\"schemaVersion\": 1", "\"schemaVersion\": 2", 1);
    let err = parse_feed(bumped.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert!(err.to_string().contains("unexpected schemaVersion: 2"), "{err}");
}
