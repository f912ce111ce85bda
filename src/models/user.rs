//! User model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::TgitClient;
use crate::error::Result;
use crate::response::Response;
use crate::traits::Get;

/// A TGit user account.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub email: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub username: String,
    #[serde_as(as = "DefaultOnNull")]
    pub web_url: String,
    #[serde_as(as = "DefaultOnNull")]
    pub is_admin: bool,
    pub bio: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub avatar_url: String,
}

impl User {
    /// Whether the account is active.
    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}

/// Fetch the authenticated user.
pub async fn current_user(client: &TgitClient) -> Result<(User, Response)> {
    User::get(client, String::new()).await
}

#[async_trait]
impl Get for User {
    /// Username or ID; blank fetches the authenticated user.
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &TgitClient, user: String) -> Result<(Self, Response)> {
        let user = user.trim();
        let path = if user.is_empty() {
            "user".to_string()
        } else {
            format!("users/{}", urlencoding::encode(user))
        };

        client.get(&path).await
    }
}
