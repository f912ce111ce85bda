//! Merge request model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::TgitClient;
use crate::error::Result;
use crate::id::ProjectId;
use crate::models::project::SortOrder;
use crate::pagination::{ListOptions, Page, Paginated};
use crate::response::Response;
use crate::traits::List;

/// User summary embedded in merge requests.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRequestUser {
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub username: String,
    #[serde_as(as = "DefaultOnNull")]
    pub web_url: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub avatar_url: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub project_id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub iid: i64,
    pub due_date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub description: Option<String>,
}

/// A reviewer assigned to a merge request.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRequestReviewer {
    /// `necessary` or `suggestion`.
    #[serde(rename = "type")]
    #[serde_as(as = "DefaultOnNull")]
    pub reviewer_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub review_state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub review_duration: i32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub username: String,
    #[serde_as(as = "DefaultOnNull")]
    pub web_url: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub avatar_url: String,
}

/// One file changed by a merge request.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffFile {
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

/// A merge request.
///
/// Listings leave `files` empty; [`get_merge_request_changes`] fills it.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRequest {
    #[serde_as(as = "DefaultOnNull")]
    pub labels: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    pub target_project_id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub target_branch: String,
    #[serde_as(as = "DefaultOnNull")]
    pub source_project_id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub source_branch: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub merge_status: String,
    #[serde_as(as = "DefaultOnNull")]
    pub iid: i64,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(with = "crate::time::option")]
    pub resolved_at: Option<DateTime<FixedOffset>>,
    pub merge_type: Option<String>,
    pub assignee: Option<MergeRequestUser>,
    pub author: Option<MergeRequestUser>,
    pub merge_commit_sha: Option<String>,
    pub milestone: Option<Milestone>,
    #[serde_as(as = "DefaultOnNull")]
    pub necessary_reviewers: Vec<MergeRequestReviewer>,
    #[serde_as(as = "DefaultOnNull")]
    pub suggestion_reviewers: Vec<MergeRequestReviewer>,
    pub base_commit: Option<String>,
    pub target_commit: Option<String>,
    pub source_commit: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub project_id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub work_in_progress: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub upvotes: i32,
    #[serde_as(as = "DefaultOnNull")]
    pub downvotes: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde_as(as = "DefaultOnNull")]
    pub files: Vec<DiffFile>,
}

impl MergeRequest {
    /// Lines added and removed across `files`.
    pub fn line_changes(&self) -> (u64, u64) {
        self.files.iter().fold((0, 0), |(add, del), f| {
            (add + u64::from(f.additions), del + u64::from(f.deletions))
        })
    }
}

/// Query parameters for listing merge requests of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListMergeRequestsOptions {
    #[serde(flatten)]
    pub list: ListOptions,

    /// Project-local merge request number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iid: Option<i64>,

    /// `opened`, `closed`, `merged`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// `created_at` or `updated_at`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl Paginated for ListMergeRequestsOptions {
    fn list_options_mut(&mut self) -> &mut ListOptions {
        &mut self.list
    }
}

#[async_trait]
impl List for MergeRequest {
    type Query = (ProjectId, ListMergeRequestsOptions);

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &TgitClient, query: &Self::Query) -> Result<Page<Self>> {
        let (project, options) = query;
        let path = format!("projects/{}/merge_requests", project.escaped());

        let (items, response) = client.get_with_query(&path, options).await?;
        Ok(Page::new(items, response))
    }
}

/// Fetch a merge request together with its changed files.
#[tracing::instrument(skip(client))]
pub async fn get_merge_request_changes(
    client: &TgitClient,
    project: &ProjectId,
    merge_request_id: i64,
) -> Result<(MergeRequest, Response)> {
    let path = format!(
        "projects/{}/merge_request/{}/changes",
        project.escaped(),
        merge_request_id
    );
    client.get(&path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_request_with_files() {
        let mr: MergeRequest = serde_json::from_value(serde_json::json!({
            "id": 55,
            "iid": 3,
            "title": "Add parser",
            "state": "opened",
            "source_branch": "feature",
            "target_branch": "master",
            "labels": ["review"],
            "author": {"id": 1, "username": "dev"},
            "necessary_reviewers": [{"type": "necessary", "id": 2, "username": "lead", "review_state": "approving"}],
            "files": [
                {"old_path": "a.rs", "new_path": "a.rs", "additions": 10, "deletions": 2},
                {"old_path": "b.rs", "new_path": "b.rs", "additions": 1, "deletions": 0, "new_file": true}
            ]
        }))
        .unwrap();

        assert_eq!(mr.iid, 3);
        assert_eq!(mr.author.as_ref().unwrap().username, "dev");
        assert_eq!(mr.necessary_reviewers[0].reviewer_type, "necessary");
        assert_eq!(mr.files.len(), 2);
        assert_eq!(mr.line_changes(), (11, 2));
    }

    #[test]
    fn test_merge_request_listing_without_files() {
        let mr: MergeRequest =
            serde_json::from_value(serde_json::json!({"id": 1, "title": "x"})).unwrap();
        assert!(mr.files.is_empty());

        let json = serde_json::to_value(&mr).unwrap();
        assert!(json.get("files").is_none());
    }

    #[test]
    fn test_list_options_encoding() {
        let options = ListMergeRequestsOptions {
            state: Some("merged".to_string()),
            sort: Some(SortOrder::Asc),
            list: ListOptions::for_page(2, 10),
            ..Default::default()
        };
        let encoded = serde_qs::to_string(&options).unwrap();

        assert!(encoded.contains("page=2"));
        assert!(encoded.contains("per_page=10"));
        assert!(encoded.contains("state=merged"));
        assert!(encoded.contains("sort=asc"));
        assert!(!encoded.contains("iid"));
    }

    #[test]
    fn test_merge_request_null_fields_decode_as_empty() {
        let mr: MergeRequest = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "x",
            "labels": null,
            "necessary_reviewers": null,
            "suggestion_reviewers": null,
            "merge_status": null,
            "upvotes": null,
            "work_in_progress": null,
            "author": {"id": 2, "username": "dev", "web_url": null},
            "files": [{"old_path": "a", "diff": null, "additions": null}]
        }))
        .unwrap();

        assert_eq!(mr.id, 1);
        assert!(mr.labels.is_empty());
        assert!(mr.necessary_reviewers.is_empty());
        assert_eq!(mr.merge_status, "");
        assert_eq!(mr.upvotes, 0);
        assert!(!mr.work_in_progress);
        assert_eq!(mr.author.as_ref().unwrap().web_url, "");
        assert_eq!(mr.files[0].additions, 0);
    }
}
