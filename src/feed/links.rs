// src/feed/links.rs
//! External links for workflows, built by plain string templating.

use super::types::Workflow;

pub const ISSUE_TRACKER_BASE: &str = "https://linear.app/issue";
pub const CODE_REVIEW_BASE: &str = "https://github.com";

/// `https://linear.app/issue/{key}`
pub fn issue_url(key: &str) -> String {
    format!("{ISSUE_TRACKER_BASE}/{}", encode_component(key))
}

/// `https://github.com/{owner}/{repo}/pull/{number}`
pub fn pull_request_url(owner: &str, repo: &str, number: u64) -> String {
    format!(
        "{CODE_REVIEW_BASE}/{}/{}/pull/{number}",
        encode_component(owner),
        encode_component(repo)
    )
}

pub fn workflow_issue_url(wf: &Workflow) -> String {
    issue_url(&wf.linear_issue_key)
}

pub fn workflow_pull_request_url(wf: &Workflow) -> String {
    pull_request_url(&wf.github.owner, &wf.github.repo, wf.github.pr_number)
}

/// Percent-encode a single path segment. Leaves the same characters alone as
/// JavaScript's `encodeURIComponent`.
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => {
                use std::fmt::Write as _;
                let _ = write!(&mut out, "%{:02X}", b);
            }
        }
    }
    out
}
