//! Command line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use gh_feed_client::{ResourceType, SearchScope, SortDirection, SortKey};
use std::fmt;

/// Browse GitHub issue and pull request activity
#[derive(Parser, Debug)]
#[command(name = "gh-feed", version)]
#[command(about = "Read-only viewer for GitHub issues, pull requests and their timelines")]
pub struct Cli {
    /// GitHub host, overrides the config file (e.g. ghe.example.com)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List repositories of the authenticated user
    Repos {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List labels of a repository
    Labels {
        /// Repository as owner/name
        #[arg(value_parser = parse_repo)]
        repo: RepoSlug,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List issues (pull requests excluded)
    Issues {
        #[arg(value_parser = parse_repo)]
        repo: RepoSlug,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List pull requests
    Pulls {
        #[arg(value_parser = parse_repo)]
        repo: RepoSlug,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show the merged timeline of an issue or pull request
    Timeline {
        #[arg(value_parser = parse_repo)]
        repo: RepoSlug,

        /// Issue or pull request number
        number: u64,

        /// The number refers to a pull request
        #[arg(long)]
        pr: bool,
    },

    /// Search issues or pull requests
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(value_parser = parse_repo)]
    pub repo: RepoSlug,

    /// Search pull requests instead of issues
    #[arg(long)]
    pub pr: bool,

    /// Free text to match
    #[arg(long)]
    pub text: Option<String>,

    /// Required label, may be repeated
    #[arg(long = "label")]
    pub labels: Vec<String>,

    /// Author login
    #[arg(long)]
    pub author: Option<String>,

    #[arg(long, value_enum, default_value_t = SortArg::Created)]
    pub sort: SortArg,

    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,

    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

impl SearchArgs {
    /// Scope described by these arguments
    pub fn scope(&self) -> SearchScope {
        let resource_type = if self.pr {
            ResourceType::PullRequest
        } else {
            ResourceType::Issue
        };

        let mut scope = SearchScope::new(&self.repo.owner, &self.repo.name, resource_type)
            .with_labels(self.labels.iter().cloned())
            .sorted_by(self.sort.into(), self.order.into());
        if let Some(text) = &self.text {
            scope = scope.with_free_text(text.as_str());
        }
        if let Some(author) = &self.author {
            scope = scope.with_author(author.as_str());
        }
        scope
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Created,
    Updated,
    Comments,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Created => SortKey::Created,
            SortArg::Updated => SortKey::Updated,
            SortArg::Comments => SortKey::CommentCount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortDirection {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortDirection::Asc,
            OrderArg::Desc => SortDirection::Desc,
        }
    }
}

/// `owner/name` repository reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn parse_repo(value: &str) -> Result<RepoSlug, String> {
    match value.trim().split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok(RepoSlug {
                owner: owner.to_string(),
                name: name.to_string(),
            })
        }
        _ => Err(format!("expected owner/name, got '{}'", value)),
    }
}
