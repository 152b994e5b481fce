//! Octocrab-based transport
//!
//! Sends raw GET requests through octocrab so the `Link` header and the
//! status code stay visible. Status mapping is done here rather than by
//! octocrab, see `error::classify_status`.

use crate::error::{classify_status, ApiError, ApiResult, RateLimitHeaders};
use crate::transport::{ApiResponse, Credential, Transport};
use crate::DEFAULT_HOST;
use async_trait::async_trait;
use http::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use log::{debug, info};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use std::fmt;
use std::sync::Arc;

/// API base URL for public GitHub
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// API base URL for a host: public GitHub or a GitHub Enterprise instance
pub fn api_base_url(host: &str) -> String {
    if host == DEFAULT_HOST {
        GITHUB_API_URL.to_string()
    } else {
        format!("https://{}/api/v3", host)
    }
}

/// Transport that talks to the real API through octocrab
#[derive(Clone)]
pub struct OctocrabTransport {
    octocrab: Arc<Octocrab>,
    base_url: String,
    /// Path prefix of `base_url` (`/api/v3` on Enterprise, empty otherwise)
    base_path: String,
}

impl OctocrabTransport {
    /// Build a transport for `base_url`
    ///
    /// Every request carries `Authorization: token <credential>` and
    /// `Accept: application/vnd.<api_media>.v3+json`. Octocrab's retry
    /// middleware is switched off.
    pub fn new(credential: &Credential, base_url: &str, api_media: &str) -> ApiResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base_path = url::Url::parse(&base_url)
            .map(|u| u.path().trim_end_matches('/').to_string())
            .map_err(ApiError::transport)?;

        let octocrab = Octocrab::builder()
            .base_uri(base_url.as_str())
            .map_err(ApiError::transport)?
            .add_header(ACCEPT, format!("application/vnd.{}.v3+json", api_media))
            .add_header(AUTHORIZATION, format!("token {}", credential.expose()))
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(ApiError::transport)?;

        info!("GitHub transport created for {}", base_url);

        Ok(Self {
            octocrab: Arc::new(octocrab),
            base_url,
            base_path,
        })
    }

    /// Transport for a host name, see `api_base_url`
    pub fn for_host(credential: &Credential, host: &str, api_media: &str) -> ApiResult<Self> {
        Self::new(credential, &api_base_url(host), api_media)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Drop the base path from host-stripped cursors so octocrab does not
    /// prefix it a second time
    fn route<'a>(&self, path: &'a str) -> &'a str {
        if self.base_path.is_empty() {
            return path;
        }
        match path.strip_prefix(self.base_path.as_str()) {
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

impl fmt::Debug for OctocrabTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OctocrabTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for OctocrabTransport {
    async fn request(&self, path: &str) -> ApiResult<ApiResponse> {
        let route = self.route(path);
        debug!("GET {}", route);

        let response = self
            .octocrab
            ._get(route)
            .await
            .map_err(ApiError::transport)?;

        let status = response.status();
        let link_header = header_value(response.headers(), "link");
        let rate_limit = RateLimitHeaders {
            remaining: header_value(response.headers(), "x-ratelimit-remaining"),
            reset: header_value(response.headers(), "x-ratelimit-reset"),
        };

        let body = self
            .octocrab
            .body_to_string(response)
            .await
            .map_err(ApiError::transport)?;

        if !status.is_success() {
            let err = classify_status(status.as_u16(), path, &rate_limit, &body);
            debug!("GET {} failed: {}", route, err);
            return Err(err);
        }

        let payload = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| {
                ApiError::transport(format!("invalid JSON from {}: {}", route, e))
            })?
        };

        Ok(ApiResponse {
            path: path.to_string(),
            payload,
            link_header,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
