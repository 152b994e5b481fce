//! gh-feed: read-only viewer for GitHub issue and pull request activity
//!
//! Usage:
//!   gh-feed issues rust-lang/rust
//!   gh-feed timeline rust-lang/rust 12345 --pr
//!   gh-feed search rust-lang/rust --text "ICE" --label C-bug --sort updated
//!   gh-feed --host ghe.example.com repos

use anyhow::Result;
use clap::Parser;
use gh_feed_client::{ClientOptions, GitHubApi, OctocrabTransport};
use gh_feed_config::AppConfig;

mod cli;
mod commands;
mod credentials;
mod logger;
mod render;

use cli::Cli;
use credentials::TokenResolver;

fn client_options(config: &AppConfig) -> ClientOptions {
    ClientOptions {
        list_page_size: config.list_page_size,
        timeline_page_size: config.timeline_page_size,
        search_page_size: config.search_page_size,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry GITHUB_TOKEN during development
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let log_file = logger::init(cli.verbose)?;
    log::info!("Starting gh-feed, logging to {}", log_file.display());

    let config = AppConfig::load();
    let host = cli.host.clone().unwrap_or_else(|| config.host.clone());

    let credential = TokenResolver::new().resolve(&host).await?;
    let transport = OctocrabTransport::for_host(&credential, &host, &config.api_version)?;
    let api = GitHubApi::with_options(transport, client_options(&config));

    let mut stdout = std::io::stdout().lock();
    let result = commands::run(&api, cli.command, &mut stdout).await;

    if let Err(ref e) = result {
        log::error!("{:#}", e);
    }
    log::info!("Exiting gh-feed");
    result
}
