//! Application configuration
//!
//! Configuration loaded from `.gh-feed.toml`, see `config_file` for the
//! lookup order.

use serde::{Deserialize, Serialize};

/// Largest `per_page` the API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Application configuration loaded from .gh-feed.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Remote host, `github.com` or a GitHub Enterprise host name
    #[serde(default = "default_host")]
    pub host: String,

    /// Media type name sent as `Accept: application/vnd.<api_version>.v3+json`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// `per_page` for repository, label, issue and pull request listings
    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,

    /// Cap for the comment and event batches of a timeline
    #[serde(default = "default_timeline_page_size")]
    pub timeline_page_size: u32,

    /// `per_page` for searches
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
}

fn default_host() -> String {
    "github.com".to_string()
}

fn default_api_version() -> String {
    "github".to_string()
}

fn default_list_page_size() -> u32 {
    100
}

fn default_timeline_page_size() -> u32 {
    100
}

fn default_search_page_size() -> u32 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_version: default_api_version(),
            list_page_size: default_list_page_size(),
            timeline_page_size: default_timeline_page_size(),
            search_page_size: default_search_page_size(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD, then home directory, then the platform config
    /// directory, or use defaults
    pub fn load() -> Self {
        match crate::load_config_file() {
            Some(content) => Self::parse(&content),
            None => {
                log::debug!("Using default app config");
                Self::default()
            }
        }
    }

    /// Parse config file content, falling back to defaults on error
    pub fn parse(content: &str) -> Self {
        match toml::from_str::<AppConfig>(content) {
            Ok(config) => {
                log::info!("Loaded app config from file");
                config.sanitized()
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }

    /// Clamp page sizes into `1..=MAX_PAGE_SIZE` and replace a blank host
    pub fn sanitized(mut self) -> Self {
        for (name, size) in [
            ("list_page_size", &mut self.list_page_size),
            ("timeline_page_size", &mut self.timeline_page_size),
            ("search_page_size", &mut self.search_page_size),
        ] {
            let clamped = (*size).clamp(1, MAX_PAGE_SIZE);
            if clamped != *size {
                log::warn!("{} = {} out of range, using {}", name, size, clamped);
                *size = clamped;
            }
        }

        let host = self.host.trim();
        self.host = if host.is_empty() {
            default_host()
        } else {
            host.to_string()
        };

        self
    }
}
