//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::TgitClient;
use crate::error::Result;
use crate::response::Response;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually,
/// usually by a project identifier plus a name such as a branch or tag.
///
/// # Example
///
/// ```ignore
/// use tgit::{Branch, Get, TgitClient};
///
/// let client = TgitClient::from_env()?;
/// let (branch, _) = Branch::get(&client, ("group/app".into(), "master".to_string())).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &TgitClient, id: Self::Id) -> Result<(Self, Response)>;
}
