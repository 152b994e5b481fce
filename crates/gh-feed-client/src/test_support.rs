//! Canned transport and JSON fixtures for tests
//!
//! Compiled for this crate's own tests and, behind the `test-support`
//! feature, for the tests of dependent crates.

use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiResponse, Transport};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum Canned {
    Ok(Value, Option<String>),
    Err(ApiError),
}

/// Transport serving canned responses keyed by exact request path
///
/// Unknown paths answer `NotFound`. One-shot responses are served before
/// the sticky one registered for the same path.
#[derive(Clone, Default)]
pub struct MockTransport {
    sticky: Arc<Mutex<HashMap<String, Canned>>>,
    once: Arc<Mutex<HashMap<String, VecDeque<Canned>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, payload: Value) {
        self.sticky
            .lock()
            .unwrap()
            .insert(path.to_string(), Canned::Ok(payload, None));
    }

    pub fn respond_with_link(&self, path: &str, payload: Value, link: &str) {
        self.sticky
            .lock()
            .unwrap()
            .insert(path.to_string(), Canned::Ok(payload, Some(link.to_string())));
    }

    pub fn respond_once(&self, path: &str, payload: Value) {
        self.once
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(Canned::Ok(payload, None));
    }

    pub fn fail(&self, path: &str, err: ApiError) {
        self.sticky
            .lock()
            .unwrap()
            .insert(path.to_string(), Canned::Err(err));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, path: &str) -> ApiResult<ApiResponse> {
        self.calls.lock().unwrap().push(path.to_string());

        let once = self
            .once
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(|queue| queue.pop_front());
        let canned = once.or_else(|| self.sticky.lock().unwrap().get(path).cloned());

        match canned {
            Some(Canned::Ok(payload, link_header)) => Ok(ApiResponse {
                path: path.to_string(),
                payload,
                link_header,
            }),
            Some(Canned::Err(err)) => Err(err),
            None => Err(ApiError::NotFound {
                path: path.to_string(),
            }),
        }
    }
}

pub fn user_json(login: &str) -> Value {
    json!({ "login": login, "avatar_url": null, "html_url": null })
}

pub fn issue_json(number: u64, created_at: DateTime<Utc>) -> Value {
    json!({
        "id": number * 1000,
        "number": number,
        "title": format!("Issue {}", number),
        "body": "Something is broken",
        "state": "open",
        "user": user_json("reporter"),
        "created_at": created_at.to_rfc3339(),
        "updated_at": created_at.to_rfc3339(),
        "html_url": format!("https://github.com/o/r/issues/{}", number),
        "labels": [],
        "assignees": [],
        "comments": 0
    })
}

pub fn pull_json(number: u64, created_at: DateTime<Utc>) -> Value {
    json!({
        "id": number * 1000,
        "number": number,
        "title": format!("PR {}", number),
        "body": null,
        "state": "closed",
        "user": user_json("contributor"),
        "created_at": created_at.to_rfc3339(),
        "updated_at": created_at.to_rfc3339(),
        "merged_at": created_at.to_rfc3339(),
        "html_url": format!("https://github.com/o/r/pull/{}", number),
        "head": { "ref": "feature", "sha": "abc123" },
        "base": { "ref": "main", "sha": "def456" },
        "labels": [],
        "assignees": []
    })
}

pub fn comment_json(id: u64, created_at: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "body": format!("comment {}", id),
        "user": user_json("commenter"),
        "created_at": created_at.to_rfc3339(),
        "updated_at": created_at.to_rfc3339(),
        "html_url": format!("https://github.com/o/r/issues/7#issuecomment-{}", id)
    })
}

pub fn event_json(id: u64, kind: &str, created_at: Option<DateTime<Utc>>) -> Value {
    json!({
        "id": id,
        "event": kind,
        "actor": user_json("maintainer"),
        "created_at": created_at.map(|t| t.to_rfc3339()),
    })
}
