//! Repository compare.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::TgitClient;
use crate::error::Result;
use crate::id::ProjectId;
use crate::models::commit::Commit;
use crate::response::Response;

/// Difference of one file between two refs.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diff {
    #[serde_as(as = "DefaultOnNull")]
    pub old_path: String,
    #[serde_as(as = "DefaultOnNull")]
    pub new_path: String,
    #[serde_as(as = "DefaultOnNull")]
    pub a_mode: u32,
    #[serde_as(as = "DefaultOnNull")]
    pub b_mode: u32,
    #[serde_as(as = "DefaultOnNull")]
    pub diff: String,
    #[serde_as(as = "DefaultOnNull")]
    pub new_file: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub renamed_file: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub deleted_file: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub is_too_large: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub is_collapse: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub additions: u32,
    #[serde_as(as = "DefaultOnNull")]
    pub deletions: u32,
}

/// Result of comparing two refs.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compare {
    pub commit: Option<Commit>,
    #[serde_as(as = "DefaultOnNull")]
    pub commits: Vec<Commit>,
    #[serde_as(as = "DefaultOnNull")]
    pub diffs: Vec<Diff>,
    #[serde_as(as = "DefaultOnNull")]
    pub compare_timeout: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub compare_same_ref: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub over_flow: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub files_total: u32,
    #[serde_as(as = "DefaultOnNull")]
    pub commits_total: u32,
}

/// Refs to compare.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompareOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl CompareOptions {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }
}

/// Compare two branches, tags or commits.
#[tracing::instrument(skip(client))]
pub async fn compare(
    client: &TgitClient,
    project: &ProjectId,
    options: &CompareOptions,
) -> Result<(Compare, Response)> {
    let path = format!("projects/{}/repository/compare", project.escaped());
    client.get_with_query(&path, options).await
}
