//! Error types for TGit API operations.

use std::fmt;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::response::Response;

/// Message used when an error body is not valid JSON.
pub const UNKNOWN_ERROR_FORMAT: &str = "failed to parse unknown error format";

/// Errors that can occur during TGit API operations.
#[derive(Debug, Error)]
pub enum TgitError {
    /// Configuration is missing or incomplete.
    #[error("TGit configuration required: {0}")]
    ConfigMissing(String),

    /// A resource identifier was neither an integer nor a string.
    #[error("invalid ID type {0}, the ID must be an int or a string")]
    InvalidId(String),

    /// A required argument was empty or otherwise unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The base URL or request path could not be resolved.
    #[error("Invalid URL: {0}")]
    MalformedUrl(#[from] url::ParseError),

    /// Request options could not be serialized to a query string or body.
    #[error("Failed to encode request options: {0}")]
    Encoding(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status outside the success set.
    #[error(transparent)]
    Api(Box<ApiError>),

    /// The response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Writing a raw response body failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TgitError {
    /// The structured API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status code of an API error.
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(|err| err.status().as_u16())
    }
}

impl From<ApiError> for TgitError {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}

/// A non-success response from the TGit API.
///
/// Carries the request method, the response envelope (status, headers,
/// final URL and pagination values), the raw body, and a message built by
/// [`normalize_error_message`].
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Method of the failed request.
    pub method: Method,
    /// Response envelope; pagination headers stay available on errors.
    pub response: Response,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Normalized, human-readable message.
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(method: Method, response: Response, body: Vec<u8>) -> Self {
        let message = match serde_json::from_slice::<Value>(&body) {
            Ok(raw) => normalize_error_message(&raw),
            Err(_) => UNKNOWN_ERROR_FORMAT.to_string(),
        };

        Self {
            method,
            response,
            body,
            message,
        }
    }

    /// Status code of the failed response.
    pub fn status(&self) -> StatusCode {
        self.response.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = &self.response.url;
        // Userinfo is left out
        let host = url.host_str().unwrap_or_default();
        let origin = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };
        let path = urlencoding::decode(url.path())
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| url.path().to_string());

        write!(
            f,
            "{} {}{}: {} {}",
            self.method,
            origin,
            path,
            self.status().as_u16(),
            self.message
        )
    }
}

impl std::error::Error for ApiError {}

/// Flatten a JSON error body into one deterministic message.
///
/// Strings are returned verbatim, arrays become `[a, b]`, and objects become
/// `{key: value}` entries sorted lexicographically and joined with `", "`.
pub fn normalize_error_message(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let errs: Vec<String> = items.iter().map(normalize_error_message).collect();
            format!("[{}]", errs.join(", "))
        }
        Value::Object(map) => {
            let mut errs: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{{{}: {}}}", k, normalize_error_message(v)))
                .collect();
            errs.sort();
            errs.join(", ")
        }
        Value::Number(_) => unexpected_type("number"),
        Value::Bool(_) => unexpected_type("bool"),
        Value::Null => unexpected_type("null"),
    }
}

fn unexpected_type(kind: &str) -> String {
    format!("failed to parse unexpected error type: {kind}")
}

/// Result type alias for TGit operations.
pub type Result<T> = core::result::Result<T, TgitError>;
