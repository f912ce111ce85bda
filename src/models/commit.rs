//! Commit model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::TgitClient;
use crate::error::{Result, TgitError};
use crate::id::{path_escape, ProjectId};
use crate::pagination::{ListOptions, Page, Paginated};
use crate::response::Response;
use crate::traits::{Get, List};

/// A repository commit.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub short_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    pub author_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub author_email: String,
    #[serde(with = "crate::time::option")]
    pub authored_date: Option<DateTime<FixedOffset>>,
    #[serde_as(as = "DefaultOnNull")]
    pub committer_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub committer_email: String,
    #[serde(with = "crate::time::option")]
    pub committed_date: Option<DateTime<FixedOffset>>,
    #[serde(with = "crate::time::option")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde_as(as = "DefaultOnNull")]
    pub message: String,
    #[serde_as(as = "DefaultOnNull")]
    pub parent_ids: Vec<String>,
}

impl Commit {
    /// Whether this is a merge commit.
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }
}

/// A branch or tag that contains a commit.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitRef {
    /// `branch` or `tag`.
    #[serde(rename = "type")]
    #[serde_as(as = "DefaultOnNull")]
    pub ref_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
}

/// Query parameters for listing commits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListCommitsOptions {
    #[serde(flatten)]
    pub list: ListOptions,

    /// Branch, tag or SHA to list from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,

    /// Only commits touching this file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Paginated for ListCommitsOptions {
    fn list_options_mut(&mut self) -> &mut ListOptions {
        &mut self.list
    }
}

/// Query parameters for listing the refs that contain a commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListCommitRefsOptions {
    #[serde(flatten)]
    pub list: ListOptions,

    /// `branch`, `tag` or `all`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
}

#[async_trait]
impl Get for Commit {
    /// Project and commit SHA (or ref name).
    type Id = (ProjectId, String);

    #[tracing::instrument(skip(client))]
    async fn get(client: &TgitClient, id: Self::Id) -> Result<(Self, Response)> {
        let (project, sha) = id;
        if sha.is_empty() {
            return Err(TgitError::InvalidArgument(
                "SHA must be a non-empty string".to_string(),
            ));
        }

        let path = format!(
            "projects/{}/repository/commits/{}",
            project.escaped(),
            urlencoding::encode(&sha)
        );
        client.get(&path).await
    }
}

#[async_trait]
impl List for Commit {
    type Query = (ProjectId, ListCommitsOptions);

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &TgitClient, query: &Self::Query) -> Result<Page<Self>> {
        let (project, options) = query;
        let path = format!("projects/{}/repository/commits", project.escaped());

        let (items, response) = client.get_with_query(&path, options).await?;
        Ok(Page::new(items, response))
    }
}

/// List the branches and tags a commit is reachable from.
#[tracing::instrument(skip(client))]
pub async fn list_commit_refs(
    client: &TgitClient,
    project: &ProjectId,
    sha: &str,
    options: &ListCommitRefsOptions,
) -> Result<Page<CommitRef>> {
    let path = format!(
        "projects/{}/repository/commits/{}/refs",
        project.escaped(),
        path_escape(sha)
    );

    let (items, response) = client.get_with_query(&path, options).await?;
    Ok(Page::new(items, response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_commit_deserialize() {
        let commit: Commit = serde_json::from_value(serde_json::json!({
            "id": "6104942438c14ec7bd21c6cd5bd995272b3faff6",
            "short_id": "6104942438c",
            "title": "Sanitize for network graph",
            "author_name": "randx",
            "author_email": "dmitriy@example.com",
            "committed_date": "2012-09-20T09:06:12+0000",
            "message": "Sanitize for network graph",
            "parent_ids": ["ae1d9fb46aa2b07ee9836d49862ec4e2c46fbbba"]
        }))
        .unwrap();

        assert_eq!(commit.short_id, "6104942438c");
        assert!(!commit.is_merge());
        assert_eq!(
            commit.committed_date.unwrap().to_rfc3339(),
            "2012-09-20T09:06:12+08:00"
        );
        assert!(commit.authored_date.is_none());
    }

    #[test]
    fn test_list_commits_options_encoding() {
        let options = ListCommitsOptions {
            ref_name: Some("master".to_string()),
            since: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            ..Default::default()
        };
        let encoded = serde_qs::to_string(&options).unwrap();

        assert!(encoded.starts_with("ref_name=master&since=2024-01-02T03"));
        assert!(!encoded.contains("until"));
        assert!(!encoded.contains("path"));
    }

    #[test]
    fn test_commit_ref_type_renamed() {
        let r: CommitRef = serde_json::from_str(r#"{"type": "tag", "name": "v1.0"}"#).unwrap();
        assert_eq!(r.ref_type, "tag");

        let encoded = serde_qs::to_string(&ListCommitRefsOptions {
            ref_type: Some("branch".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(encoded, "type=branch");
    }

    #[test]
    fn test_commit_null_fields_decode_as_empty() {
        let commit: Commit = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "message": null,
            "parent_ids": null,
            "committed_date": null
        }))
        .unwrap();

        assert_eq!(commit.id, "abc");
        assert_eq!(commit.message, "");
        assert!(commit.parent_ids.is_empty());
        assert!(commit.committed_date.is_none());

        let commit_ref: CommitRef =
            serde_json::from_value(serde_json::json!({"type": null, "name": "v1"})).unwrap();
        assert_eq!(commit_ref.ref_type, "");
    }
}
