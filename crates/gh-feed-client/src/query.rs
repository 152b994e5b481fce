//! Scoped search queries
//!
//! Issue and pull request listings with filters go through the unified
//! search endpoint. A `SearchScope` describes *what* to look for; a
//! `SearchRequest` adds *which page* and renders the request path.
//!
//! Query grammar produced:
//!
//! ```text
//! repo:<owner>/<name> type:<issue|pr> [free text] [label:"<name>"]* [author:<login>]
//! ```
//!
//! Sort key and direction are separate endpoint parameters and never
//! appear inside `q`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::form_urlencoded;

use crate::pagination::PaginationState;

/// Search endpoint path
pub const SEARCH_PATH: &str = "/search/issues";

/// Which kind of thread to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Issue,
    PullRequest,
}

impl ResourceType {
    /// Value of the `type:` qualifier
    pub fn qualifier(&self) -> &'static str {
        match self {
            ResourceType::Issue => "issue",
            ResourceType::PullRequest => "pr",
        }
    }
}

/// Search sort key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Created,
    Updated,
    CommentCount,
}

impl SortKey {
    /// Value of the `sort` parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Updated => "updated",
            SortKey::CommentCount => "comments",
        }
    }
}

/// Search sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Value of the `order` parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Filters and ordering for one search
///
/// Every `with_*` method consumes the scope and returns a new one, so a
/// filter change always yields a fresh value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchScope {
    owner: String,
    repo: String,
    resource_type: ResourceType,
    free_text: String,
    label_filters: BTreeSet<String>,
    author_filter: Option<String>,
    sort_key: SortKey,
    sort_direction: SortDirection,
}

impl SearchScope {
    /// Unfiltered scope for a repository, newest first
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            resource_type,
            free_text: String::new(),
            label_filters: BTreeSet::new(),
            author_filter: None,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
        }
    }

    pub fn with_free_text(self, text: impl Into<String>) -> Self {
        Self {
            free_text: text.into().trim().to_string(),
            ..self
        }
    }

    /// Add a label filter; blank names are ignored
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        let label = label.trim();
        if !label.is_empty() {
            self.label_filters.insert(label.to_string());
        }
        self
    }

    pub fn with_labels<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels.into_iter().fold(self, |scope, label| scope.with_label(label))
    }

    pub fn without_label(mut self, label: &str) -> Self {
        self.label_filters.remove(label.trim());
        self
    }

    /// Restrict to one author; a blank login clears the filter
    pub fn with_author(self, login: impl Into<String>) -> Self {
        let login = login.into().trim().to_string();
        Self {
            author_filter: (!login.is_empty()).then_some(login),
            ..self
        }
    }

    pub fn without_author(self) -> Self {
        Self {
            author_filter: None,
            ..self
        }
    }

    pub fn sorted_by(self, sort_key: SortKey, sort_direction: SortDirection) -> Self {
        Self {
            sort_key,
            sort_direction,
            ..self
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    pub fn label_filters(&self) -> &BTreeSet<String> {
        &self.label_filters
    }

    pub fn author_filter(&self) -> Option<&str> {
        self.author_filter.as_deref()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Render the `q` parameter
    pub fn query(&self) -> String {
        build_query(self)
    }
}

/// Render the `q` parameter for a scope
pub fn build_query(scope: &SearchScope) -> String {
    let mut clauses = vec![
        format!("repo:{}/{}", scope.owner, scope.repo),
        format!("type:{}", scope.resource_type.qualifier()),
    ];

    if !scope.free_text.is_empty() {
        clauses.push(scope.free_text.clone());
    }

    // one clause per label: the grammar ANDs separate clauses, a comma list would OR them
    for label in &scope.label_filters {
        clauses.push(format!("label:\"{}\"", label.replace('"', "")));
    }

    if let Some(author) = &scope.author_filter {
        clauses.push(format!("author:{}", author));
    }

    clauses.join(" ")
}

/// One page of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    scope: SearchScope,
    page: u32,
    per_page: u32,
}

impl SearchRequest {
    /// First page of `scope`
    pub fn new(scope: SearchScope, per_page: u32) -> Self {
        Self {
            scope,
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Same scope, different page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            scope: self.scope.clone(),
            page: page.max(1),
            per_page: self.per_page,
        }
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Request path including all endpoint parameters
    pub fn path(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("q", &self.scope.query())
            .append_pair("sort", self.scope.sort_key.as_param())
            .append_pair("order", self.scope.sort_direction.as_param())
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &self.page.to_string())
            .finish();
        format!("{}?{}", SEARCH_PATH, query)
    }

    /// Count-based pagination for a response reporting `total_count` hits
    pub fn pagination(&self, total_count: u64) -> PaginationState {
        PaginationState::from_total_count(&self.path(), total_count, self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{page_from_path, query_param, Cursor};
    use pretty_assertions::assert_eq;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_full_query() {
        let scope = SearchScope::new("owner", "repo", ResourceType::Issue)
            .with_free_text("  bug ")
            .with_labels(["needs-triage", "P1 urgent"])
            .with_author("alice");

        let q = scope.query();
        for clause in [
            "repo:owner/repo",
            "type:issue",
            "bug",
            "label:\"needs-triage\"",
            "label:\"P1 urgent\"",
            "author:alice",
        ] {
            assert_eq!(count(&q, clause), 1, "clause {} in {}", clause, q);
        }
        assert!(!q.contains(','));
    }

    #[test]
    fn test_minimal_query() {
        let q = SearchScope::new("o", "r", ResourceType::PullRequest).query();
        assert_eq!(q, "repo:o/r type:pr");
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let scope = SearchScope::new("o", "r", ResourceType::Issue)
            .with_free_text("   ")
            .with_label(" ")
            .with_author("  ");
        assert_eq!(scope.query(), "repo:o/r type:issue");
        assert_eq!(scope.author_filter(), None);
    }

    #[test]
    fn test_duplicate_labels_appear_once() {
        let scope = SearchScope::new("o", "r", ResourceType::Issue)
            .with_label("bug")
            .with_label("bug");
        assert_eq!(count(&scope.query(), "label:\"bug\""), 1);

        let scope = scope.without_label("bug");
        assert!(scope.label_filters().is_empty());
    }

    #[test]
    fn test_filter_change_produces_new_scope() {
        let base = SearchScope::new("o", "r", ResourceType::Issue);
        let filtered = base.clone().with_author("bob");
        assert_ne!(base, filtered);
        assert_eq!(base.author_filter(), None);
    }

    #[test]
    fn test_sort_is_not_part_of_query() {
        let scope = SearchScope::new("o", "r", ResourceType::Issue)
            .sorted_by(SortKey::CommentCount, SortDirection::Asc);
        assert!(!scope.query().contains("comments"));

        let path = SearchRequest::new(scope, 30).path();
        assert!(path.starts_with("/search/issues?"));
        assert_eq!(query_param(&path, "sort").as_deref(), Some("comments"));
        assert_eq!(query_param(&path, "order").as_deref(), Some("asc"));
        assert_eq!(query_param(&path, "per_page").as_deref(), Some("30"));
        assert_eq!(query_param(&path, "q").as_deref(), Some("repo:o/r type:issue"));
        assert_eq!(page_from_path(&path), 1);
    }

    #[test]
    fn test_search_pagination_cursors_follow_request() {
        let request = SearchRequest::new(
            SearchScope::new("o", "r", ResourceType::Issue).with_label("P1 urgent"),
            30,
        )
        .with_page(2);

        let state = request.pagination(95);
        assert!(state.has_next());
        assert!(state.has_prev());
        assert_eq!(state.current_page(), 2);
        assert_eq!(
            state.next_cursor().map(Cursor::as_path),
            Some(request.with_page(3).path().as_str())
        );
        assert_eq!(
            state.prev_cursor().map(Cursor::as_path),
            Some(request.with_page(1).path().as_str())
        );
    }

    #[test]
    fn test_changed_scope_changes_cursors() {
        let request = SearchRequest::new(SearchScope::new("o", "r", ResourceType::Issue), 30);
        let refined = SearchRequest::new(request.scope().clone().with_author("carol"), 30);

        let a = request.pagination(100);
        let b = refined.pagination(100);
        assert_ne!(a.next_cursor(), b.next_cursor());
    }
}
