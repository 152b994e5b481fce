//! Subcommand execution

use crate::cli::{Command, RepoSlug, SearchArgs};
use crate::render;
use anyhow::{Context, Result};
use gh_feed_client::{GitHubApi, SearchRequest, ThreadRef, Transport};
use log::info;
use std::io::Write;

/// Run one subcommand, writing plain text to `out`
pub async fn run<T: Transport, W: Write>(
    api: &GitHubApi<T>,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Repos { page } => {
            let listing = api
                .user_repositories(page)
                .await
                .context("Failed to list repositories")?;
            for repo in &listing.items {
                writeln!(out, "{}", render::format_repository(repo))?;
            }
            writeln!(out, "{}", render::format_pagination(&listing.pagination))?;
        }
        Command::Labels { repo, page } => {
            let listing = api
                .labels(&repo.owner, &repo.name, page)
                .await
                .with_context(|| format!("Failed to list labels of {}", repo))?;
            for label in &listing.items {
                writeln!(out, "{}", render::format_label(label))?;
            }
            writeln!(out, "{}", render::format_pagination(&listing.pagination))?;
        }
        Command::Issues { repo, page } => {
            let listing = api
                .issues(&repo.owner, &repo.name, page)
                .await
                .with_context(|| format!("Failed to list issues of {}", repo))?;
            for issue in &listing.items {
                writeln!(out, "{}", render::format_issue(issue))?;
            }
            writeln!(out, "{}", render::format_pagination(&listing.pagination))?;
        }
        Command::Pulls { repo, page } => {
            let listing = api
                .pull_requests(&repo.owner, &repo.name, page)
                .await
                .with_context(|| format!("Failed to list pull requests of {}", repo))?;
            for pull in &listing.items {
                writeln!(out, "{}", render::format_pull(pull))?;
            }
            writeln!(out, "{}", render::format_pagination(&listing.pagination))?;
        }
        Command::Timeline { repo, number, pr } => {
            timeline(api, &repo, number, pr, out).await?;
        }
        Command::Search(args) => {
            search(api, &args, out).await?;
        }
    }
    Ok(())
}

async fn timeline<T: Transport, W: Write>(
    api: &GitHubApi<T>,
    repo: &RepoSlug,
    number: u64,
    is_pull_request: bool,
    out: &mut W,
) -> Result<()> {
    let thread = ThreadRef::new(&repo.owner, &repo.name, number);
    let entries = api
        .build_timeline(&thread, is_pull_request)
        .await
        .with_context(|| format!("Failed to load timeline of {}", thread))?;

    info!("Timeline of {} has {} entries", thread, entries.len());
    for entry in &entries {
        writeln!(out, "{}", render::format_entry(entry))?;
    }
    Ok(())
}

async fn search<T: Transport, W: Write>(
    api: &GitHubApi<T>,
    args: &SearchArgs,
    out: &mut W,
) -> Result<()> {
    let request = SearchRequest::new(args.scope(), api.options().search_page_size)
        .with_page(args.page);
    info!("Searching: {}", request.scope().query());

    let page = api.search(&request).await.context("Search failed")?;
    if page.incomplete_results {
        writeln!(out, "(results may be incomplete)")?;
    }
    for issue in &page.items {
        writeln!(out, "{}", render::format_issue(issue))?;
    }
    writeln!(out, "{}", render::format_pagination(&page.pagination))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use gh_feed_client::test_support::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    async fn run_with(transport: MockTransport, args: &[&str]) -> Result<String> {
        let api = GitHubApi::new(transport);
        let cli = Cli::try_parse_from(args)?;

        let mut out = Vec::new();
        run(&api, cli.command, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    async fn run_args(routes: Vec<(&str, Value)>, args: &[&str]) -> Result<String> {
        let transport = MockTransport::new();
        for (path, payload) in routes {
            transport.respond(path, payload);
        }
        run_with(transport, args).await
    }

    fn issue(number: u64, title: &str, created_at: &str) -> Value {
        json!({
            "id": number,
            "number": number,
            "title": title,
            "state": "open",
            "user": { "login": "alice" },
            "created_at": created_at,
            "updated_at": created_at,
            "html_url": format!("https://github.com/acme/widgets/issues/{}", number),
            "labels": [{ "name": "bug", "color": "d73a4a" }]
        })
    }

    #[tokio::test]
    async fn test_timeline_output() {
        let output = run_args(
            vec![
                (
                    "/repos/acme/widgets/issues/7",
                    issue(7, "Crash on start", "2024-01-01T10:00:00Z"),
                ),
                (
                    "/repos/acme/widgets/issues/7/comments?per_page=100",
                    json!([{
                        "id": 1,
                        "body": "Same here\nlogs attached",
                        "user": { "login": "bob" },
                        "created_at": "2024-01-01T11:00:00Z",
                        "updated_at": "2024-01-01T11:00:00Z",
                        "html_url": "https://github.com/acme/widgets/issues/7#issuecomment-1"
                    }]),
                ),
                (
                    "/repos/acme/widgets/issues/7/events?per_page=100",
                    json!([{
                        "id": 2,
                        "event": "closed",
                        "actor": null,
                        "created_at": "2024-01-02T09:30:00Z"
                    }]),
                ),
            ],
            &["gh-feed", "timeline", "acme/widgets", "7"],
        )
        .await
        .unwrap();

        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "2024-01-01 10:00  alice opened issue #7: Crash on start (Open) [bug]",
                "2024-01-01 11:00  bob commented: Same here",
                "2024-01-02 09:30  system closed this",
            ]
        );
    }

    #[tokio::test]
    async fn test_search_output() {
        let request = SearchRequest::new(
            Cli::try_parse_from(["gh-feed", "search", "acme/widgets", "--text", "crash"])
                .map(|cli| match cli.command {
                    Command::Search(args) => args.scope(),
                    other => panic!("unexpected command {:?}", other),
                })
                .unwrap(),
            30,
        );
        let path = request.path();

        let output = run_args(
            vec![(
                path.as_str(),
                json!({
                    "total_count": 1,
                    "incomplete_results": true,
                    "items": [issue(7, "Crash on start", "2024-01-01T10:00:00Z")]
                }),
            )],
            &["gh-feed", "search", "acme/widgets", "--text", "crash"],
        )
        .await
        .unwrap();

        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "(results may be incomplete)",
                "#7      Open    Crash on start [bug]",
                "1-1 of 1, page 1/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_repository_reports_context() {
        let err = run_args(vec![], &["gh-feed", "labels", "acme/nothing"])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to list labels of acme/nothing");
        assert!(err.root_cause().to_string().contains("/repos/acme/nothing/labels"));
    }

    #[tokio::test]
    async fn test_repos_page_is_forwarded() {
        let transport = MockTransport::new();
        transport.respond_with_link(
            "/user/repos?per_page=100&page=2",
            json!([{
                "id": 1,
                "name": "widgets",
                "full_name": "acme/widgets",
                "owner": { "login": "acme" },
                "html_url": "https://github.com/acme/widgets"
            }]),
            r#"<https://api.github.com/user/repos?per_page=100&page=1>; rel="prev", <https://api.github.com/user/repos?per_page=100&page=3>; rel="next""#,
        );

        let output = run_with(transport, &["gh-feed", "repos", "--page", "2"])
            .await
            .unwrap();

        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "acme/widgets",
                "page 2, --page 1 for previous, --page 3 for more",
            ]
        );
    }

    #[tokio::test]
    async fn test_labels_print_pagination_footer() {
        let transport = MockTransport::new();
        transport.respond_with_link(
            "/repos/acme/widgets/labels?per_page=100&page=1",
            json!([{ "name": "bug", "color": "d73a4a", "description": "Something is broken" }]),
            r#"<https://api.github.com/repositories/42/labels?per_page=100&page=2>; rel="next""#,
        );

        let output = run_with(transport, &["gh-feed", "labels", "acme/widgets"])
            .await
            .unwrap();

        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec!["#d73a4a bug  Something is broken", "page 1, --page 2 for more"]
        );
    }
}
