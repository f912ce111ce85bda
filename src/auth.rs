//! Authentication schemes accepted by the TGit API.

use std::fmt;

use reqwest::RequestBuilder;

/// Header carrying a private (personal API) token.
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";
/// Header carrying an OAuth access token.
pub const OAUTH_TOKEN_HEADER: &str = "OAUTH-TOKEN";

/// Credentials used by a [`TgitClient`](crate::TgitClient).
///
/// Exactly one scheme is active per client and it is fixed at construction.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTP basic authentication.
    Basic { username: String, password: String },
    /// OAuth access token, sent as `OAUTH-TOKEN`.
    OAuthToken(String),
    /// Private token, sent as `PRIVATE-TOKEN`.
    PrivateToken(String),
}

impl Auth {
    /// Attach the credentials to an outgoing request.
    pub fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::OAuthToken(token) => request.header(OAUTH_TOKEN_HEADER, token),
            Self::PrivateToken(token) => request.header(PRIVATE_TOKEN_HEADER, token),
        }
    }

    /// Short name of the scheme, for logs.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::OAuthToken(_) => "oauth",
            Self::PrivateToken(_) => "private-token",
        }
    }
}

// Credentials never appear in debug output.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::OAuthToken(_) => f.write_str("OAuthToken(..)"),
            Self::PrivateToken(_) => f.write_str("PrivateToken(..)"),
        }
    }
}
