//! Pagination state for list and search responses
//!
//! GitHub paginates in two incompatible ways:
//!
//! - **Cursor mode**: list endpoints return a `Link` header with
//!   `<url>; rel="next"` style entries and no total count.
//! - **Count mode**: the search endpoint returns `total_count` in the body
//!   and no `Link` header, so page boundaries are computed client-side.
//!
//! A `PaginationState` is built once per response and never modified.
//! It is always in exactly one of the two modes.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;
use url::form_urlencoded;

/// Opaque reference to another page of the same listing
///
/// Holds a host-relative request path (path plus query string), ready to
/// hand back to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    pub(crate) fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The request path this cursor points at
    pub fn as_path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a page sits within its listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    has_next: bool,
    has_prev: bool,
    current_page: u32,
    next_cursor: Option<Cursor>,
    prev_cursor: Option<Cursor>,
    total_count: Option<u64>,
    page_size: Option<u32>,
}

impl PaginationState {
    /// A listing that fits on one page
    pub fn single_page(current_page: u32) -> Self {
        Self {
            has_next: false,
            has_prev: false,
            current_page: current_page.max(1),
            next_cursor: None,
            prev_cursor: None,
            total_count: None,
            page_size: None,
        }
    }

    /// Cursor mode: parse a `Link` header
    ///
    /// `request_path` is the path that produced the response; its `page`
    /// query parameter (default 1) becomes the current page. Relations
    /// other than `next` and `prev` are ignored, as are malformed entries.
    pub fn from_link_header(link_header: Option<&str>, request_path: &str) -> Self {
        let mut state = Self::single_page(page_from_path(request_path));

        let Some(header) = link_header else {
            return state;
        };

        for (url, rels) in link_entries(header) {
            let Some(path) = strip_host(url) else {
                continue;
            };
            for rel in rels.split_whitespace() {
                match rel {
                    "next" => {
                        state.has_next = true;
                        state.next_cursor = Some(Cursor::new(path.clone()));
                    }
                    "prev" => {
                        state.has_prev = true;
                        state.prev_cursor = Some(Cursor::new(path.clone()));
                    }
                    _ => {}
                }
            }
        }

        state
    }

    /// Count mode: derive boundaries from a known total
    ///
    /// Cursors are synthesized by rewriting the `page` parameter of
    /// `request_path`, so they stay tied to the exact query that produced
    /// this page.
    pub fn from_total_count(request_path: &str, total_count: u64, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let current_page = page_from_path(request_path);
        let total_pages = total_count.div_ceil(u64::from(page_size));

        let has_next = u64::from(current_page) < total_pages;
        let has_prev = current_page > 1;

        Self {
            has_next,
            has_prev,
            current_page,
            next_cursor: has_next.then(|| Cursor::new(with_page(request_path, current_page + 1))),
            prev_cursor: has_prev.then(|| Cursor::new(with_page(request_path, current_page - 1))),
            total_count: Some(total_count),
            page_size: Some(page_size),
        }
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_prev(&self) -> bool {
        self.has_prev
    }

    /// 1-based page number
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.next_cursor.as_ref()
    }

    pub fn prev_cursor(&self) -> Option<&Cursor> {
        self.prev_cursor.as_ref()
    }

    /// Total number of items (count mode only)
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Items per page (count mode only)
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    pub fn is_count_based(&self) -> bool {
        self.total_count.is_some()
    }

    /// `ceil(total_count / page_size)` in count mode
    pub fn total_pages(&self) -> Option<u64> {
        let total = self.total_count?;
        let size = u64::from(self.page_size?);
        Some(total.div_ceil(size))
    }

    /// 1-based item indices shown on this page, e.g. `31..=60`
    ///
    /// `None` in cursor mode, or when the page lies past the end.
    pub fn item_range(&self) -> Option<RangeInclusive<u64>> {
        let total = self.total_count?;
        let size = u64::from(self.page_size?);
        let start = u64::from(self.current_page - 1) * size + 1;
        let end = (u64::from(self.current_page) * size).min(total);
        (start <= end).then_some(start..=end)
    }
}

fn link_entry_regex() -> &'static Regex {
    static LINK_ENTRY: OnceLock<Regex> = OnceLock::new();
    LINK_ENTRY.get_or_init(|| Regex::new(r"^\s*<([^>]*)>(.*)$").unwrap())
}

fn rel_param_regex() -> &'static Regex {
    static REL_PARAM: OnceLock<Regex> = OnceLock::new();
    REL_PARAM.get_or_init(|| Regex::new(r#"(?i);\s*rel\s*=\s*(?:"([^"]*)"|([^\s;]+))"#).unwrap())
}

/// Split a `Link` header into `(url, rel)` pairs
fn link_entries(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header.split(',').filter_map(|entry| {
        let caps = link_entry_regex().captures(entry)?;
        let url = caps.get(1)?.as_str().trim();
        let params = caps.get(2)?.as_str();
        let rel = rel_param_regex().captures(params)?;
        let rel = rel.get(1).or_else(|| rel.get(2))?.as_str();
        Some((url, rel))
    })
}

/// Reduce an absolute URL to its path and query
///
/// Already-relative paths pass through unchanged.
pub fn strip_host(url: &str) -> Option<String> {
    if url.starts_with('/') {
        return Some(url.to_string());
    }

    let parsed = url::Url::parse(url).ok()?;
    let mut path = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }
    Some(path)
}

/// Value of the `page` query parameter, defaulting to 1
pub fn page_from_path(path: &str) -> u32 {
    query_of(path)
        .and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.trim().parse::<u32>().ok())
        })
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Value of an arbitrary query parameter
pub fn query_param(path: &str, name: &str) -> Option<String> {
    let query = query_of(path)?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Same path with the `page` parameter replaced (or appended)
pub fn with_page(path: &str, page: u32) -> String {
    let (base, query) = match path.split_once('?') {
        Some((base, query)) => (base, query),
        None => (path, ""),
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut replaced = false;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key == "page" {
            if !replaced {
                serializer.append_pair("page", &page.to_string());
                replaced = true;
            }
        } else {
            serializer.append_pair(&key, &value);
        }
    }
    if !replaced {
        serializer.append_pair("page", &page.to_string());
    }

    format!("{}?{}", base, serializer.finish())
}

fn query_of(path: &str) -> Option<&str> {
    path.split_once('?').map(|(_, query)| query)
}
