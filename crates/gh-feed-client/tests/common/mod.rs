//! Shared fixtures for the integration tests

// each test binary uses a different subset
#![allow(dead_code)]

use serde_json::{json, Value};

pub fn user(login: &str) -> Value {
    json!({ "login": login })
}

pub fn issue(number: u64, created_at: &str) -> Value {
    json!({
        "id": number,
        "number": number,
        "title": format!("Issue {}", number),
        "body": "details",
        "state": "open",
        "user": user("alice"),
        "created_at": created_at,
        "updated_at": created_at,
        "html_url": format!("https://github.com/acme/widgets/issues/{}", number),
        "labels": [{ "name": "bug", "color": "d73a4a" }],
        "comments": 2
    })
}

pub fn pull(number: u64, created_at: &str, merged_at: Option<&str>) -> Value {
    json!({
        "id": number,
        "number": number,
        "title": format!("PR {}", number),
        "state": if merged_at.is_some() { "closed" } else { "open" },
        "user": user("bob"),
        "created_at": created_at,
        "updated_at": created_at,
        "merged_at": merged_at,
        "html_url": format!("https://github.com/acme/widgets/pull/{}", number),
        "head": { "ref": "fix-widgets", "sha": "aaa111" },
        "base": { "ref": "main", "sha": "bbb222" }
    })
}

pub fn comment(id: u64, created_at: &str) -> Value {
    json!({
        "id": id,
        "body": format!("comment {}", id),
        "user": user("carol"),
        "created_at": created_at,
        "updated_at": created_at,
        "html_url": format!("https://github.com/acme/widgets/issues/1#issuecomment-{}", id)
    })
}

pub fn event(id: u64, kind: &str, created_at: Value) -> Value {
    json!({
        "id": id,
        "event": kind,
        "actor": user("dave"),
        "created_at": created_at
    })
}
