//! Credential lookup for the CLI
//!
//! Tokens are read from the environment or the `gh` CLI and only ever held
//! in memory.

use anyhow::{Context, Result};
use gh_feed_client::{Credential, DEFAULT_HOST};
use log::debug;

/// Resolves the API credential for a host
///
/// Tries multiple sources in order:
/// 1. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 2. `gh auth token --hostname {host}` command
/// 3. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
#[derive(Clone)]
pub struct TokenResolver {
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok()
            .filter(|token| !token.trim().is_empty());

        Self { default_token }
    }

    /// Get the credential for `host`
    pub async fn resolve(&self, host: &str) -> Result<Credential> {
        let env_key = host_env_key(host);
        if let Some(token) = std::env::var(&env_key).ok().filter(|t| !t.trim().is_empty()) {
            debug!("Using token from env var {} for host {}", env_key, host);
            return Ok(Credential::new(token.trim()));
        }

        debug!("Trying gh auth token for host {}", host);
        match gh_auth_token(host).await {
            Ok(Some(token)) => {
                debug!("Using token from gh CLI for host {}", host);
                return Ok(Credential::new(token));
            }
            Ok(None) => {}
            Err(e) => debug!("gh auth token unavailable: {:#}", e),
        }

        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(Credential::new(token.trim()));
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. \
             Set {} or run 'gh auth login --hostname {}'",
            host,
            env_key,
            host
        ))
    }
}

/// Env var holding the token of a specific host
pub fn host_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

async fn gh_auth_token(host: &str) -> Result<Option<String>> {
    let output = tokio::process::Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .await
        .context("Failed to run 'gh auth token'")?;

    if !output.status.success() {
        return Ok(None);
    }

    let token = String::from_utf8(output.stdout)
        .context("Invalid UTF-8 in gh auth token output")?
        .trim()
        .to_string();

    Ok((!token.is_empty()).then_some(token))
}
