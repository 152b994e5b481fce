mod common;

use common::{comment, event, issue, pull};
use gh_feed_client::test_support::MockTransport;
use gh_feed_client::{
    ApiError, EventKind, GitHubApi, ThreadRef, ThreadState, TimelinePayload, SYSTEM_ACTOR,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const ISSUE: &str = "/repos/acme/widgets/issues/1";
const PULL: &str = "/repos/acme/widgets/pulls/1";
const COMMENTS: &str = "/repos/acme/widgets/issues/1/comments?per_page=100";
const EVENTS: &str = "/repos/acme/widgets/issues/1/events?per_page=100";

fn thread() -> ThreadRef {
    ThreadRef::new("acme", "widgets", 1)
}

fn labels(entries: &[gh_feed_client::TimelineEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match &entry.payload {
            TimelinePayload::Thread(t) => format!("thread#{}", t.number()),
            TimelinePayload::Comment(c) => format!("comment#{}", c.id),
            TimelinePayload::Event(e) => format!("{}#{}", e.kind, e.id.unwrap_or(0)),
        })
        .collect()
}

#[tokio::test]
async fn issue_timeline_is_chronological() {
    let github = MockTransport::new();
    github.respond(ISSUE, issue(1, "2024-01-01T10:00:00Z"));
    github.respond(
        COMMENTS,
        json!([
            comment(20, "2024-01-03T10:00:00Z"),
            comment(21, "2024-01-01T12:00:00Z"),
        ]),
    );
    github.respond(
        EVENTS,
        json!([
            event(30, "labeled", json!("2024-01-02T10:00:00Z")),
            event(31, "closed", json!("2024-01-04T10:00:00Z")),
        ]),
    );

    let api = GitHubApi::new(github.clone());
    let timeline = api.build_timeline(&thread(), false).await.unwrap();

    assert_eq!(
        labels(&timeline),
        vec!["thread#1", "comment#21", "labeled#30", "comment#20", "closed#31"]
    );
    assert!(timeline.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(github.call_count(), 3);
}

#[tokio::test]
async fn merged_pull_request_hides_closed_event() {
    let github = MockTransport::new();
    github.respond(
        PULL,
        pull(1, "2024-02-01T09:00:00Z", Some("2024-02-02T09:00:00Z")),
    );
    github.respond(COMMENTS, json!([]));
    github.respond(
        EVENTS,
        json!([
            event(40, "merged", json!("2024-02-02T09:00:00Z")),
            event(41, "closed", json!("2024-02-02T09:00:00Z")),
            event(42, "head_ref_deleted", json!("2024-02-02T09:00:01Z")),
        ]),
    );

    let api = GitHubApi::new(github);
    let timeline = api.build_timeline(&thread(), true).await.unwrap();

    assert_eq!(
        labels(&timeline),
        vec!["thread#1", "merged#40", "head_ref_deleted#42"]
    );
    match &timeline[0].payload {
        TimelinePayload::Thread(t) => assert_eq!(t.state(), ThreadState::Merged),
        other => panic!("expected thread first, got {:?}", other),
    }
}

#[tokio::test]
async fn events_without_timestamp_or_actor() {
    let github = MockTransport::new();
    github.respond(ISSUE, issue(1, "2024-01-01T10:00:00Z"));
    github.respond(COMMENTS, json!([]));
    let mut anonymous = event(50, "referenced", json!("2024-01-02T00:00:00Z"));
    anonymous["actor"] = Value::Null;
    github.respond(
        EVENTS,
        json!([
            event(51, "renamed", Value::Null),
            event(52, "locked", json!("not a date")),
            Value::Null,
            anonymous,
        ]),
    );

    let api = GitHubApi::new(github);
    let timeline = api.build_timeline(&thread(), false).await.unwrap();

    assert_eq!(labels(&timeline), vec!["thread#1", "referenced#50"]);
    match &timeline[1].payload {
        TimelinePayload::Event(e) => {
            assert_eq!(e.kind, EventKind::Other("referenced".to_string()));
            assert_eq!(e.actor_login().unwrap_or(SYSTEM_ACTOR), "system");
        }
        other => panic!("expected event, got {:?}", other),
    }
}

#[tokio::test]
async fn failing_history_degrades_to_thread_only() {
    let github = MockTransport::new();
    github.respond(ISSUE, issue(1, "2024-01-01T10:00:00Z"));
    github.respond(COMMENTS, json!([comment(20, "2024-01-03T10:00:00Z")]));
    github.fail(
        EVENTS,
        ApiError::Remote {
            status: 502,
            message: "Bad Gateway".to_string(),
        },
    );

    let api = GitHubApi::new(github.clone());
    let timeline = api.build_timeline(&thread(), false).await.unwrap();

    assert_eq!(labels(&timeline), vec!["thread#1"]);
    let detail_requests = github.calls_to(ISSUE);
    assert_eq!(detail_requests, 2);
}

#[tokio::test]
async fn missing_thread_is_an_error() {
    let github = MockTransport::new();
    github.respond(COMMENTS, json!([]));
    github.respond(EVENTS, json!([]));

    let api = GitHubApi::new(github);
    let err = api.build_timeline(&thread(), false).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(err.status(), Some(404));
}
