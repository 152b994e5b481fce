//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub REST API.
//! Decoding happens once, at the transport boundary; nothing downstream
//! inspects raw JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A GitHub account (user, organization or bot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name
    pub login: String,

    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Profile URL
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A repository label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: Option<u64>,

    /// Label name (may contain spaces and punctuation)
    pub name: String,

    /// Hex color without the leading `#`
    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// A repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    pub owner: User,
    pub html_url: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of an issue or pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadState {
    Open,
    Closed,
    Merged,
}

impl ThreadState {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ThreadState::Open => "Open",
            ThreadState::Closed => "Closed",
            ThreadState::Merged => "Merged",
        }
    }
}

/// Marker present on issues that are backed by a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestMarker {
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// An issue as returned by the issues and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: ThreadState,

    /// Author, absent for deleted accounts
    #[serde(default)]
    pub user: Option<User>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Vec<User>,

    /// Number of comments
    #[serde(default)]
    pub comments: u64,

    /// Set when this issue is really a pull request
    #[serde(default)]
    pub pull_request: Option<PullRequestMarker>,
}

impl Issue {
    /// Whether this issue is backed by a pull request
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// One side of a pull request (head or base)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,

    #[serde(default)]
    pub sha: Option<String>,
}

/// A pull request as returned by the pulls endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,

    /// Raw state as reported: GitHub only ever sends `open` or `closed`
    pub state: ThreadState,

    #[serde(default)]
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    pub html_url: String,
    pub head: BranchRef,
    pub base: BranchRef,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Vec<User>,

    /// Only the single-PR endpoint reports this
    #[serde(default)]
    pub comments: u64,
}

/// An issue or a pull request, the subject of a timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ThreadItem {
    Issue(Issue),
    PullRequest(PullRequest),
}

impl ThreadItem {
    pub fn number(&self) -> u64 {
        match self {
            ThreadItem::Issue(i) => i.number,
            ThreadItem::PullRequest(p) => p.number,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ThreadItem::Issue(i) => &i.title,
            ThreadItem::PullRequest(p) => &p.title,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ThreadItem::Issue(i) => i.body.as_deref(),
            ThreadItem::PullRequest(p) => p.body.as_deref(),
        }
    }

    /// Effective state; a pull request with a merge timestamp is `Merged`
    pub fn state(&self) -> ThreadState {
        match self {
            ThreadItem::Issue(i) => i.state,
            ThreadItem::PullRequest(p) if p.merged_at.is_some() => ThreadState::Merged,
            ThreadItem::PullRequest(p) => p.state,
        }
    }

    pub fn author(&self) -> Option<&User> {
        match self {
            ThreadItem::Issue(i) => i.user.as_ref(),
            ThreadItem::PullRequest(p) => p.user.as_ref(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ThreadItem::Issue(i) => i.created_at,
            ThreadItem::PullRequest(p) => p.created_at,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            ThreadItem::Issue(i) => i.updated_at,
            ThreadItem::PullRequest(p) => p.updated_at,
        }
    }

    pub fn labels(&self) -> &[Label] {
        match self {
            ThreadItem::Issue(i) => &i.labels,
            ThreadItem::PullRequest(p) => &p.labels,
        }
    }

    pub fn assignees(&self) -> &[User] {
        match self {
            ThreadItem::Issue(i) => &i.assignees,
            ThreadItem::PullRequest(p) => &p.assignees,
        }
    }

    pub fn comment_count(&self) -> u64 {
        match self {
            ThreadItem::Issue(i) => i.comments,
            ThreadItem::PullRequest(p) => p.comments,
        }
    }

    pub fn html_url(&self) -> &str {
        match self {
            ThreadItem::Issue(i) => &i.html_url,
            ThreadItem::PullRequest(p) => &p.html_url,
        }
    }

    pub fn is_pull_request(&self) -> bool {
        matches!(self, ThreadItem::PullRequest(_))
    }
}

/// A comment on an issue or pull request conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
}

/// Kind of an issue event
///
/// Kinds this crate does not know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Closed,
    Reopened,
    Labeled,
    Unlabeled,
    Assigned,
    Unassigned,
    Milestoned,
    Demilestoned,
    Renamed,
    Locked,
    Unlocked,
    Merged,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Closed => "closed",
            EventKind::Reopened => "reopened",
            EventKind::Labeled => "labeled",
            EventKind::Unlabeled => "unlabeled",
            EventKind::Assigned => "assigned",
            EventKind::Unassigned => "unassigned",
            EventKind::Milestoned => "milestoned",
            EventKind::Demilestoned => "demilestoned",
            EventKind::Renamed => "renamed",
            EventKind::Locked => "locked",
            EventKind::Unlocked => "unlocked",
            EventKind::Merged => "merged",
            EventKind::Other(raw) => raw,
        }
    }
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "closed" => EventKind::Closed,
            "reopened" => EventKind::Reopened,
            "labeled" => EventKind::Labeled,
            "unlabeled" => EventKind::Unlabeled,
            "assigned" => EventKind::Assigned,
            "unassigned" => EventKind::Unassigned,
            "milestoned" => EventKind::Milestoned,
            "demilestoned" => EventKind::Demilestoned,
            "renamed" => EventKind::Renamed,
            "locked" => EventKind::Locked,
            "unlocked" => EventKind::Unlocked,
            "merged" => EventKind::Merged,
            _ => EventKind::Other(raw),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label payload of `labeled` / `unlabeled` events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLabel {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Title change payload of `renamed` events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Milestone payload of `milestoned` / `demilestoned` events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMilestone {
    pub title: String,
}

/// An entry of the issue events endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(rename = "event")]
    pub kind: EventKind,

    /// Absent for system-generated events
    #[serde(default)]
    pub actor: Option<User>,

    /// `None` when the server sent no timestamp or one that does not parse
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub label: Option<EventLabel>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub rename: Option<Rename>,
    #[serde(default)]
    pub milestone: Option<EventMilestone>,
}

impl ActivityEvent {
    /// Login of the actor; `None` means the event was system-generated
    pub fn actor_login(&self) -> Option<&str> {
        self.actor.as_ref().map(|a| a.login.as_str())
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc)))
}

/// Body of the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<T>,
}
