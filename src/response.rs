//! Response envelope with pagination metadata.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

const X_TOTAL: &str = "X-Total";
const X_TOTAL_PAGES: &str = "X-Total-Pages";
const X_PER_PAGE: &str = "X-Per-Page";
const X_PAGE: &str = "X-Page";
const X_NEXT_PAGE: &str = "X-Next-Page";
const X_PREV_PAGE: &str = "X-Prev-Page";

/// Metadata of a completed API exchange.
///
/// Wraps the status, headers and final URL of the HTTP response together
/// with the pagination values TGit reports through `X-*` headers. A header
/// that is missing or not a number leaves its field at `0`.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Final URL of the request.
    pub url: Url,

    /// Total number of items (`X-Total`).
    pub total_items: u64,
    /// Total number of pages (`X-Total-Pages`).
    pub total_pages: u64,
    /// Items per page (`X-Per-Page`).
    pub items_per_page: u64,
    /// Current page (`X-Page`).
    pub current_page: u64,
    /// Next page, `0` on the last page (`X-Next-Page`).
    pub next_page: u64,
    /// Previous page, `0` on the first page (`X-Prev-Page`).
    pub previous_page: u64,
}

impl Response {
    /// Build the envelope from the parts of an HTTP response.
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url) -> Self {
        Self {
            total_items: header_value(&headers, X_TOTAL),
            total_pages: header_value(&headers, X_TOTAL_PAGES),
            items_per_page: header_value(&headers, X_PER_PAGE),
            current_page: header_value(&headers, X_PAGE),
            next_page: header_value(&headers, X_NEXT_PAGE),
            previous_page: header_value(&headers, X_PREV_PAGE),
            status,
            headers,
            url,
        }
    }

    pub(crate) fn from_http(response: &reqwest::Response) -> Self {
        Self::new(
            response.status(),
            response.headers().clone(),
            response.url().clone(),
        )
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}
