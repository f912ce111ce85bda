//! Branch model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::TgitClient;
use crate::error::Result;
use crate::id::ProjectId;
use crate::models::commit::Commit;
use crate::pagination::{ListOptions, Page, Paginated};
use crate::response::Response;
use crate::traits::{Get, List};

/// A repository branch.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branch {
    pub commit: Option<Commit>,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub protected: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub developers_can_push: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub developers_can_merge: bool,
}

/// Query parameters for listing branches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListBranchesOptions {
    #[serde(flatten)]
    pub list: ListOptions,
}

impl Paginated for ListBranchesOptions {
    fn list_options_mut(&mut self) -> &mut ListOptions {
        &mut self.list
    }
}

#[async_trait]
impl Get for Branch {
    /// Project and branch name.
    type Id = (ProjectId, String);

    #[tracing::instrument(skip(client))]
    async fn get(client: &TgitClient, id: Self::Id) -> Result<(Self, Response)> {
        let (project, branch) = id;
        let path = format!(
            "projects/{}/repository/branches/{}",
            project.escaped(),
            urlencoding::encode(&branch)
        );
        client.get(&path).await
    }
}

#[async_trait]
impl List for Branch {
    type Query = (ProjectId, ListBranchesOptions);

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &TgitClient, query: &Self::Query) -> Result<Page<Self>> {
        let (project, options) = query;
        let path = format!("projects/{}/repository/branches", project.escaped());

        let (items, response) = client.get_with_query(&path, options).await?;
        Ok(Page::new(items, response))
    }
}
