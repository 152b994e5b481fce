//! Read-only GitHub client for issue and pull request activity
//!
//! This crate lists repositories, labels, issues and pull requests, runs
//! issue searches with structured filters, and merges a thread with its
//! comments and events into a single chronological timeline. Every
//! listing carries pagination state that can be followed in both
//! directions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  GitHubApi<T>                    │
//! │  - issues() / pull_requests() / labels()         │
//! │  - search() / follow_search()                    │
//! │  - build_timeline()                              │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌─────────────────────────────────────────────────┐
//! │                Transport trait                   │
//! │  - request(path) -> ApiResponse                  │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌───────────────────┐
//!              │ OctocrabTransport │
//!              │ (github.com, GHE) │
//!              └───────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_feed_client::{Credential, GitHubApi, OctocrabTransport, ThreadRef};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let transport = OctocrabTransport::for_host(&Credential::new("token"), "github.com", "github")?;
//! let api = GitHubApi::new(transport);
//!
//! let timeline = api
//!     .build_timeline(&ThreadRef::new("rust-lang", "rust", 1), false)
//!     .await?;
//! for entry in &timeline {
//!     println!("{}", entry.timestamp);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod octocrab_transport;
pub mod pagination;
pub mod query;
pub mod timeline;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use api::{ClientOptions, GitHubApi, Page, SearchPage};
pub use error::{ApiError, ApiResult};
pub use octocrab_transport::{api_base_url, OctocrabTransport, GITHUB_API_URL};
pub use pagination::{Cursor, PaginationState};
pub use query::{
    build_query, ResourceType, SearchRequest, SearchScope, SortDirection, SortKey,
};
pub use timeline::{merge_timeline, ThreadRef, TimelineEntry, TimelinePayload, SYSTEM_ACTOR};
pub use transport::{ApiResponse, Credential, Transport};
pub use types::{
    ActivityEvent, BranchRef, Comment, EventKind, Issue, Label, PullRequest, Repository,
    ThreadItem, ThreadState, User,
};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
