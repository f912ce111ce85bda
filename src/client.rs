//! TGit API client.
//!
//! Low-level HTTP client that builds authenticated requests and decodes
//! responses. Resource operations are implemented via traits and functions
//! on the model types, all of which funnel through [`TgitClient::new_request`]
//! and the `execute*` methods.

use std::env;
use std::io::Write;
use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Request};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::Auth;
use crate::error::{ApiError, Result, TgitError};
use crate::response::Response;
use crate::transport::Transport;

const DEFAULT_BASE_URL: &str = "https://git.code.tencent.com/";
const API_VERSION_PATH: &str = "api/v3/";
const DEFAULT_USER_AGENT: &str = concat!("tgit-rs/", env!("CARGO_PKG_VERSION"));

/// Status codes treated as success.
const SUCCESS_STATUSES: [u16; 5] = [200, 201, 202, 204, 304];

/// Low-level TGit API client.
///
/// Holds the base URL, credentials and user agent, and sends requests
/// through a [`Transport`]. Entity-specific operations are implemented via
/// the `Get` and `List` traits and the free functions on model types.
///
/// This struct is cheaply cloneable; clones share the same transport.
///
/// # Example
///
/// ```no_run
/// use tgit::{TgitClient, Transport};
///
/// # fn example() -> tgit::Result<()> {
/// // Create from environment variables
/// let client = TgitClient::from_env()?;
///
/// // Or configure manually
/// let client = TgitClient::new(Transport::default(), "your-private-token")?
///     .with_base_url("https://git.example.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TgitClient {
    transport: Transport,
    base_url: Arc<Url>,
    auth: Arc<Auth>,
    user_agent: Option<String>,
}

impl std::fmt::Debug for TgitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TgitClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth.scheme())
            .finish_non_exhaustive()
    }
}

impl TgitClient {
    /// Create a client authenticating with a private token.
    ///
    /// # Errors
    ///
    /// Returns an error if the default base URL cannot be parsed.
    pub fn new(transport: Transport, token: &str) -> Result<Self> {
        Self::with_auth(transport, Auth::PrivateToken(token.to_string()))
    }

    /// Create a client authenticating with an OAuth token.
    pub fn new_oauth(transport: Transport, token: &str) -> Result<Self> {
        Self::with_auth(transport, Auth::OAuthToken(token.to_string()))
    }

    /// Create a client using HTTP basic authentication.
    pub fn new_basic_auth(transport: Transport, username: &str, password: &str) -> Result<Self> {
        Self::with_auth(
            transport,
            Auth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
        )
    }

    /// Create a client with an explicit authentication scheme.
    pub fn with_auth(transport: Transport, auth: Auth) -> Result<Self> {
        Ok(Self {
            transport,
            base_url: Arc::new(normalize_base_url(DEFAULT_BASE_URL)?),
            auth: Arc::new(auth),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Create a client from environment variables.
    ///
    /// Credentials come from the first of `TGIT_TOKEN` (private token),
    /// `TGIT_OAUTH_TOKEN`, or `TGIT_USERNAME` plus `TGIT_PASSWORD` that is
    /// set. `TGIT_API_URL` optionally overrides the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials are configured or the URL is invalid.
    pub fn from_env() -> Result<Self> {
        let auth = auth_from_env()?;
        let client = Self::with_auth(Transport::default(), auth)?;

        match env::var("TGIT_API_URL") {
            Ok(url) if !url.trim().is_empty() => client.with_base_url(url.trim()),
            _ => Ok(client),
        }
    }

    /// Replace the base URL, returning the updated client.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.set_base_url(base_url)?;
        Ok(self)
    }

    /// Set the user agent sent with each request; `None` sends none.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: Option<&str>) -> Self {
        self.user_agent = user_agent.map(str::to_string);
        self
    }

    /// Reset the base URL.
    ///
    /// The URL is normalized to end with `/` and to contain the API version
    /// path exactly once.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = Arc::new(normalize_base_url(base_url)?);
        Ok(())
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The active authentication scheme.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The configured user agent.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Build an authenticated request for `path` relative to the base URL.
    ///
    /// For `POST`, `PUT` and `DELETE` the options become a JSON body; for
    /// any other method they become query parameters. `path` must already
    /// be escaped; its escapes are sent unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TgitError::Encoding`] if the options cannot be serialized,
    /// [`TgitError::InvalidArgument`] if a path segment is `.` or `..`, and
    /// [`TgitError::MalformedUrl`] if the URL cannot be resolved.
    pub fn new_request<O>(&self, method: Method, path: &str, options: Option<&O>) -> Result<Request>
    where
        O: Serialize + ?Sized,
    {
        if let Some(segment) = path.split('/').find(|s| is_dot_segment(s)) {
            return Err(TgitError::InvalidArgument(format!(
                "path segment {segment:?} would be resolved as a relative path"
            )));
        }
        let mut url = Url::parse(&format!("{}{}", self.base_url.as_str(), path))?;

        let sends_body = method == Method::POST || method == Method::PUT || method == Method::DELETE;
        let mut body = None;
        if let Some(options) = options {
            if sends_body {
                body = Some(serde_json::to_vec(options).map_err(|e| TgitError::Encoding(e.to_string()))?);
            } else {
                let query =
                    serde_qs::to_string(&options).map_err(|e| TgitError::Encoding(e.to_string()))?;
                if !query.is_empty() {
                    url.set_query(Some(&query));
                }
            }
        }

        let mut builder = self
            .transport
            .http()
            .request(method, url)
            .header(ACCEPT, "application/json");

        if let Some(user_agent) = &self.user_agent {
            builder = builder.header(USER_AGENT, user_agent);
        }
        if sends_body {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        Ok(self.auth.authenticate(builder).build()?)
    }

    /// Send a request and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`TgitError::Api`] for non-success statuses and
    /// [`TgitError::Decode`] if the body does not match `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<(T, Response)> {
        let (response, envelope) = self.send(request).await?;
        let body = response.bytes().await?;
        let value = serde_json::from_slice(&body)?;
        Ok((value, envelope))
    }

    /// Send a request and stream the raw body into `writer`.
    pub async fn execute_to_writer<W>(&self, request: Request, writer: &mut W) -> Result<Response>
    where
        W: Write + Send + ?Sized,
    {
        let (mut response, envelope) = self.send(request).await?;
        while let Some(chunk) = response.chunk().await? {
            writer.write_all(&chunk)?;
        }
        writer.flush()?;
        Ok(envelope)
    }

    /// Send a request whose body is not needed.
    pub async fn execute_empty(&self, request: Request) -> Result<Response> {
        let (_, envelope) = self.send(request).await?;
        Ok(envelope)
    }

    /// Make a GET request without options.
    #[tracing::instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<(T, Response)> {
        let request = self.new_request::<()>(Method::GET, path, None)?;
        self.execute(request).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<(T, Response)>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized + Sync,
    {
        let request = self.new_request(Method::GET, path, Some(query))?;
        self.execute(request).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<(T, Response)>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let request = self.new_request(Method::POST, path, Some(body))?;
        self.execute(request).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<(T, Response)>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let request = self.new_request(Method::PUT, path, Some(body))?;
        self.execute(request).await
    }

    /// Make a DELETE request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn delete<T, B>(&self, path: &str, body: &B) -> Result<(T, Response)>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let request = self.new_request(Method::DELETE, path, Some(body))?;
        self.execute(request).await
    }

    /// Send through the transport and classify the status.
    async fn send(&self, request: Request) -> Result<(reqwest::Response, Response)> {
        let method = request.method().clone();
        let response = self.transport.send(request).await?;
        let envelope = Response::from_http(&response);

        tracing::debug!(
            %method,
            url = %envelope.url,
            status = envelope.status.as_u16(),
            "TGit API response"
        );

        if SUCCESS_STATUSES.contains(&envelope.status.as_u16()) {
            return Ok((response, envelope));
        }

        let body = response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .unwrap_or_default();
        Err(ApiError::new(method, envelope, body).into())
    }
}

/// Ensure a trailing `/` and exactly one API version segment.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let base_url_str = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };

    let mut url = Url::parse(&base_url_str)?;
    if !url.path().ends_with(API_VERSION_PATH) {
        let path = format!("{}{}", url.path(), API_VERSION_PATH);
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// `.` and `..`, escaped or not; URL parsing would collapse them.
fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | "%2e%2e" | ".%2e" | "%2e."
    )
}

fn auth_from_env() -> Result<Auth> {
    let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

    if let Some(token) = var("TGIT_TOKEN") {
        return Ok(Auth::PrivateToken(token));
    }
    if let Some(token) = var("TGIT_OAUTH_TOKEN") {
        return Ok(Auth::OAuthToken(token));
    }
    match (var("TGIT_USERNAME"), var("TGIT_PASSWORD")) {
        (Some(username), Some(password)) => Ok(Auth::Basic { username, password }),
        _ => Err(TgitError::ConfigMissing(
            "set TGIT_TOKEN, TGIT_OAUTH_TOKEN, or TGIT_USERNAME and TGIT_PASSWORD".to_string(),
        )),
    }
}
