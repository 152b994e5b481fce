//! Thread timeline aggregation
//!
//! A timeline is the thread itself, its comments and its events, merged
//! into one chronologically ordered list. The three parts are fetched
//! concurrently; if comments or events cannot be fetched the timeline
//! degrades to the thread alone instead of failing.

use crate::api::GitHubApi;
use crate::error::ApiResult;
use crate::transport::Transport;
use crate::types::{ActivityEvent, Comment, EventKind, ThreadItem};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Actor name consumers show for events without an actor
pub const SYSTEM_ACTOR: &str = "system";

/// Identifies an issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl ThreadRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// What a timeline entry holds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TimelinePayload {
    Thread(ThreadItem),
    Comment(Comment),
    Event(ActivityEvent),
}

/// One entry of a merged timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Ordering key, copied from the payload's creation time
    pub timestamp: DateTime<Utc>,
    pub payload: TimelinePayload,
}

impl TimelineEntry {
    pub fn is_thread(&self) -> bool {
        matches!(self.payload, TimelinePayload::Thread(_))
    }
}

/// Merge a thread, its comments and its events into timeline order
///
/// Events without a usable timestamp are dropped, as are `closed` events
/// of pull requests (the `merged` event already covers them). Comments
/// and events with an id seen earlier in the batch are dropped too.
///
/// Ordering is by timestamp; the sort is stable and the input is laid
/// out thread first, then comments, then events, so equal timestamps
/// keep that precedence and the fetch order within each kind.
pub fn merge_timeline(
    thread: ThreadItem,
    comments: Vec<Comment>,
    events: Vec<ActivityEvent>,
    is_pull_request: bool,
) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(1 + comments.len() + events.len());

    entries.push(TimelineEntry {
        timestamp: thread.created_at(),
        payload: TimelinePayload::Thread(thread),
    });

    let mut seen_comments = HashSet::new();
    entries.extend(
        comments
            .into_iter()
            .filter(|c| seen_comments.insert(c.id))
            .map(|c| TimelineEntry {
                timestamp: c.created_at,
                payload: TimelinePayload::Comment(c),
            }),
    );

    let mut seen_events = HashSet::new();
    entries.extend(
        events
            .into_iter()
            .filter(|e| !(is_pull_request && e.kind == EventKind::Closed))
            .filter_map(|e| {
                let timestamp = e.created_at?;
                // an undated event must not claim the id of a later valid one
                if let Some(id) = e.id {
                    if !seen_events.insert(id) {
                        return None;
                    }
                }
                Some(TimelineEntry {
                    timestamp,
                    payload: TimelinePayload::Event(e),
                })
            }),
    );

    entries.sort_by_key(|entry| entry.timestamp);
    entries
}

impl<T: Transport> GitHubApi<T> {
    /// Build the merged timeline of a thread
    ///
    /// Detail, comments and events are requested concurrently. When all
    /// three succeed the result is `merge_timeline` of them. When the
    /// detail succeeds but comments or events fail, the thread is fetched
    /// again on its own and returned as a one-entry timeline. A detail
    /// failure is returned to the caller unchanged.
    pub async fn build_timeline(
        &self,
        thread: &ThreadRef,
        is_pull_request: bool,
    ) -> ApiResult<Vec<TimelineEntry>> {
        debug!("Building timeline for {}", thread);

        let (detail, comments, events) = tokio::join!(
            self.thread(thread, is_pull_request),
            self.issue_comments(thread),
            self.issue_events(thread),
        );

        let detail = detail?;

        match (comments, events) {
            (Ok(comments), Ok(events)) => {
                let entries = merge_timeline(detail, comments, events, is_pull_request);
                debug!("Timeline for {} has {} entries", thread, entries.len());
                Ok(entries)
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(
                    "Timeline history for {} unavailable, showing thread only: {}",
                    thread, err
                );
                self.thread_only_timeline(thread, is_pull_request).await
            }
        }
    }

    async fn thread_only_timeline(
        &self,
        thread: &ThreadRef,
        is_pull_request: bool,
    ) -> ApiResult<Vec<TimelineEntry>> {
        let item = self.thread(thread, is_pull_request).await?;
        Ok(vec![TimelineEntry {
            timestamp: item.created_at(),
            payload: TimelinePayload::Thread(item),
        }])
    }
}
