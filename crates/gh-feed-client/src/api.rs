//! Read-only GitHub endpoints
//!
//! `GitHubApi` wraps any `Transport` and turns raw responses into typed
//! pages. Every method issues exactly one request, except `issues`, which
//! filters pull requests out of the page it received.

use crate::error::ApiResult;
use crate::pagination::{page_from_path, query_param, Cursor, PaginationState};
use crate::query::SearchRequest;
use crate::timeline::ThreadRef;
use crate::transport::Transport;
use crate::types::{
    ActivityEvent, Comment, Issue, Label, PullRequest, Repository, SearchResponse, ThreadItem,
};
use log::debug;
use serde::de::DeserializeOwned;

/// Page sizes used by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// `per_page` for repository, label, issue and pull request listings
    pub list_page_size: u32,
    /// Cap for the comment and event batches of a timeline
    pub timeline_page_size: u32,
    /// `per_page` for the search endpoint
    pub search_page_size: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            list_page_size: 100,
            timeline_page_size: 100,
            search_page_size: 30,
        }
    }
}

/// One page of a cursor-paginated listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationState,
}

/// One page of search results
#[derive(Debug, Clone)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
    pub pagination: PaginationState,
    /// The server gave up before scanning everything
    pub incomplete_results: bool,
}

/// Read-only GitHub API over a transport
#[derive(Debug, Clone)]
pub struct GitHubApi<T> {
    transport: T,
    options: ClientOptions,
}

impl<T: Transport> GitHubApi<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ClientOptions::default())
    }

    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        Self { transport, options }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.transport.request(path).await?.decode()
    }

    async fn get_page<R: DeserializeOwned>(&self, path: &str) -> ApiResult<Page<R>> {
        let response = self.transport.request(path).await?;
        let items: Vec<R> = response.decode()?;
        let pagination = response.pagination();
        debug!("{} -> {} items, page {}", path, items.len(), pagination.current_page());
        Ok(Page { items, pagination })
    }

    pub async fn repository(&self, owner: &str, repo: &str) -> ApiResult<Repository> {
        self.get(&format!("/repos/{}/{}", owner, repo)).await
    }

    /// Repositories of the authenticated user
    pub async fn user_repositories(&self, page: u32) -> ApiResult<Page<Repository>> {
        self.get_page(&format!(
            "/user/repos?per_page={}&page={}",
            self.options.list_page_size,
            page.max(1)
        ))
        .await
    }

    pub async fn labels(&self, owner: &str, repo: &str, page: u32) -> ApiResult<Page<Label>> {
        self.get_page(&format!(
            "/repos/{}/{}/labels?per_page={}&page={}",
            owner,
            repo,
            self.options.list_page_size,
            page.max(1)
        ))
        .await
    }

    /// Issues in any state, without pull requests
    ///
    /// The issues endpoint mixes in pull requests; they are dropped here,
    /// so a page may hold fewer items than `list_page_size`.
    pub async fn issues(&self, owner: &str, repo: &str, page: u32) -> ApiResult<Page<Issue>> {
        let mut listing: Page<Issue> = self
            .get_page(&format!(
                "/repos/{}/{}/issues?state=all&per_page={}&page={}",
                owner,
                repo,
                self.options.list_page_size,
                page.max(1)
            ))
            .await?;
        listing.items.retain(|issue| !issue.is_pull_request());
        Ok(listing)
    }

    /// Pull requests in any state
    pub async fn pull_requests(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> ApiResult<Page<PullRequest>> {
        self.get_page(&format!(
            "/repos/{}/{}/pulls?state=all&per_page={}&page={}",
            owner,
            repo,
            self.options.list_page_size,
            page.max(1)
        ))
        .await
    }

    pub async fn issue(&self, owner: &str, repo: &str, number: u64) -> ApiResult<Issue> {
        self.get(&format!("/repos/{}/{}/issues/{}", owner, repo, number))
            .await
    }

    pub async fn pull_request(&self, owner: &str, repo: &str, number: u64) -> ApiResult<PullRequest> {
        self.get(&format!("/repos/{}/{}/pulls/{}", owner, repo, number))
            .await
    }

    /// Detail of an issue or pull request
    pub async fn thread(&self, thread: &ThreadRef, is_pull_request: bool) -> ApiResult<ThreadItem> {
        if is_pull_request {
            self.pull_request(&thread.owner, &thread.repo, thread.number)
                .await
                .map(ThreadItem::PullRequest)
        } else {
            self.issue(&thread.owner, &thread.repo, thread.number)
                .await
                .map(ThreadItem::Issue)
        }
    }

    /// Conversation comments, one batch of at most `timeline_page_size`
    pub async fn issue_comments(&self, thread: &ThreadRef) -> ApiResult<Vec<Comment>> {
        self.get(&format!(
            "/repos/{}/{}/issues/{}/comments?per_page={}",
            thread.owner, thread.repo, thread.number, self.options.timeline_page_size
        ))
        .await
    }

    /// Issue events, one batch of at most `timeline_page_size`
    ///
    /// `null` entries in the response are skipped.
    pub async fn issue_events(&self, thread: &ThreadRef) -> ApiResult<Vec<ActivityEvent>> {
        let events: Vec<Option<ActivityEvent>> = self
            .get(&format!(
                "/repos/{}/{}/issues/{}/events?per_page={}",
                thread.owner, thread.repo, thread.number, self.options.timeline_page_size
            ))
            .await?;
        Ok(events.into_iter().flatten().collect())
    }

    /// Run one page of a search
    pub async fn search(&self, request: &SearchRequest) -> ApiResult<SearchPage<Issue>> {
        let path = request.path();
        let response: SearchResponse<Issue> = self.get(&path).await?;
        debug!(
            "search '{}' page {} -> {} of {} items",
            request.scope().query(),
            request.page(),
            response.items.len(),
            response.total_count
        );
        Ok(SearchPage {
            pagination: request.pagination(response.total_count),
            items: response.items,
            incomplete_results: response.incomplete_results,
        })
    }

    /// Fetch the listing page a cursor points at
    pub async fn follow<R: DeserializeOwned>(&self, cursor: &Cursor) -> ApiResult<Page<R>> {
        self.get_page(cursor.as_path()).await
    }

    /// Fetch the search page a count-mode cursor points at
    ///
    /// Pagination is recomputed from the new response's `total_count`.
    pub async fn follow_search(&self, cursor: &Cursor) -> ApiResult<SearchPage<Issue>> {
        let path = cursor.as_path();
        let page_size = query_param(path, "per_page")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(self.options.search_page_size);

        let response: SearchResponse<Issue> = self.get(path).await?;
        debug!(
            "search page {} -> {} of {} items",
            page_from_path(path),
            response.items.len(),
            response.total_count
        );
        Ok(SearchPage {
            pagination: PaginationState::from_total_count(path, response.total_count, page_size),
            items: response.items,
            incomplete_results: response.incomplete_results,
        })
    }
}
