//! Error taxonomy for remote API access
//!
//! Every failure the client can surface maps to exactly one variant.
//! Nothing in this crate retries: the caller decides whether to degrade
//! or propagate.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

/// Result alias used throughout the client
pub type ApiResult<T> = Result<T, ApiError>;

/// A failed API request
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 401, or 403 without a rate-limit signal
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// 404
    #[error("not found: {path}")]
    NotFound { path: String },

    /// 429, or 403 carrying a rate-limit signal
    #[error("rate limited ({status}){}", reset_suffix(.reset))]
    RateLimited {
        status: u16,
        reset: Option<DateTime<Utc>>,
    },

    /// Any other non-2xx status
    #[error("GitHub API error {status}: {message}")]
    Remote { status: u16, message: String },

    /// Network failure or a body that could not be decoded
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl ApiError {
    /// Wrap a network or decode failure
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::Transport {
            message: err.to_string(),
        }
    }

    /// HTTP status behind this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. }
            | ApiError::RateLimited { status, .. }
            | ApiError::Remote { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Transport { .. } => None,
        }
    }
}

/// Rate-limit related response headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// `x-ratelimit-remaining`
    pub remaining: Option<String>,
    /// `x-ratelimit-reset`, seconds since the epoch
    pub reset: Option<String>,
}

impl RateLimitHeaders {
    fn exhausted(&self) -> bool {
        self.remaining.as_deref().map(str::trim) == Some("0")
    }

    fn reset_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.reset.as_deref()?.trim().parse::<i64>().ok()?;
        Utc.timestamp_opt(secs, 0).single()
    }
}

/// Map a non-2xx response onto the error taxonomy
///
/// `body` is the raw response body; GitHub error bodies carry a JSON
/// `message` field which is preserved when present.
pub fn classify_status(status: u16, path: &str, rate_limit: &RateLimitHeaders, body: &str) -> ApiError {
    let message = error_message(body);

    match status {
        429 => ApiError::RateLimited {
            status,
            reset: rate_limit.reset_at(),
        },
        403 if rate_limit.exhausted() || mentions_rate_limit(&message) => ApiError::RateLimited {
            status,
            reset: rate_limit.reset_at(),
        },
        401 | 403 => ApiError::Unauthorized { status, message },
        404 => ApiError::NotFound {
            path: path.to_string(),
        },
        _ => ApiError::Remote { status, message },
    }
}

fn reset_suffix(reset: &Option<DateTime<Utc>>) -> String {
    reset
        .map(|r| format!(", resets at {}", r.to_rfc3339()))
        .unwrap_or_default()
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn mentions_rate_limit(message: &str) -> bool {
    message.to_lowercase().contains("rate limit")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_headers() -> RateLimitHeaders {
        RateLimitHeaders::default()
    }

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_status(401, "/user", &no_headers(), r#"{"message":"Bad credentials"}"#);
        match err {
            ApiError::Unauthorized { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Bad credentials");
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = classify_status(403, "/repos/o/r", &no_headers(), r#"{"message":"Resource not accessible"}"#);
        assert!(matches!(err, ApiError::Unauthorized { status: 403, .. }));
    }

    #[test]
    fn test_classify_rate_limited() {
        let headers = RateLimitHeaders {
            remaining: Some("0".to_string()),
            reset: Some("1700000000".to_string()),
        };
        let err = classify_status(403, "/repos/o/r/issues", &headers, "{}");
        match err {
            ApiError::RateLimited { status, reset } => {
                assert_eq!(status, 403);
                assert_eq!(reset.map(|r| r.timestamp()), Some(1_700_000_000));
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = classify_status(
            403,
            "/search/issues",
            &no_headers(),
            r#"{"message":"API rate limit exceeded for user ID 1."}"#,
        );
        assert!(matches!(err, ApiError::RateLimited { status: 403, reset: None }));

        let err = classify_status(429, "/search/issues", &no_headers(), "");
        assert!(matches!(err, ApiError::RateLimited { status: 429, .. }));
    }

    #[test]
    fn test_classify_not_found_and_remote() {
        let err = classify_status(404, "/repos/o/missing", &no_headers(), "{}");
        assert!(matches!(err, ApiError::NotFound { ref path } if path == "/repos/o/missing"));
        assert_eq!(err.status(), Some(404));

        let err = classify_status(502, "/repos/o/r", &no_headers(), "Bad Gateway");
        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = ApiError::transport("connection reset");
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "transport error: connection reset");
    }
}
