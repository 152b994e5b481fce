//! Transport trait and response envelope
//!
//! The `Transport` trait is the single seam between the client and the
//! network. `OctocrabTransport` is the real implementation; tests plug in
//! canned responses.

use crate::error::{ApiError, ApiResult};
use crate::pagination::PaginationState;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

/// An API token
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the authorization header only
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A successful response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Request path that produced this response
    pub path: String,

    /// Decoded JSON body
    pub payload: serde_json::Value,

    /// Raw `Link` header, if the server sent one
    pub link_header: Option<String>,
}

impl ApiResponse {
    /// Decode the payload into a typed value
    ///
    /// A payload that does not match the expected shape is a transport
    /// failure, same as a body that is not JSON at all.
    pub fn decode<T: DeserializeOwned>(&self) -> ApiResult<T> {
        T::deserialize(&self.payload).map_err(|e| {
            ApiError::transport(format!("failed to decode response of {}: {}", self.path, e))
        })
    }

    /// Cursor pagination from the `Link` header
    pub fn pagination(&self) -> PaginationState {
        PaginationState::from_link_header(self.link_header.as_deref(), &self.path)
    }
}

/// Issues GET requests against the remote API
///
/// Implementations must not retry: every failure is returned as is.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so the timeline fan-out can
/// hold several requests in flight.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` (host-relative, including the query string)
    async fn request(&self, path: &str) -> ApiResult<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, path: &str) -> ApiResult<ApiResponse> {
        (**self).request(path).await
    }
}
