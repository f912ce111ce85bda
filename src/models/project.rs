//! Project model and trait implementations.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::TgitClient;
use crate::error::Result;
use crate::models::user::User;
use crate::pagination::{ListOptions, Page, Paginated};
use crate::traits::List;

/// Project visibility level as reported by TGit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityLevel(pub u32);

impl VisibilityLevel {
    pub const PRIVATE: Self = Self(0);
    pub const INTERNAL: Self = Self(10);
    pub const PUBLIC: Self = Self(20);
}

impl fmt::Display for VisibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PRIVATE => f.write_str("private"),
            Self::INTERNAL => f.write_str("internal"),
            Self::PUBLIC => f.write_str("public"),
            Self(other) => write!(f, "level {other}"),
        }
    }
}

/// Sort key for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectOrderBy {
    Id,
    Name,
    Path,
    CreatedAt,
    UpdatedAt,
    LastActivityAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for listing projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListProjectsOptions {
    #[serde(flatten)]
    pub list: ListOptions,

    /// Filter by name (partial match).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Include archived projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_archived: Option<bool>,

    /// Only projects the user can push to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_push: Option<bool>,

    /// Only abandoned projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandoned: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_level: Option<VisibilityLevel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<ProjectOrderBy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl Paginated for ListProjectsOptions {
    fn list_options_mut(&mut self) -> &mut ListOptions {
        &mut self.list
    }
}

/// Namespace (group or user) that owns a project.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectNamespace {
    #[serde(with = "crate::time::option")]
    pub created_at: Option<DateTime<FixedOffset>>,
    pub description: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub owner_id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub path: String,
    #[serde(with = "crate::time::option")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Storage limits configured for a project.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfigStorage {
    #[serde_as(as = "DefaultOnNull")]
    pub limit_lfs_file_size: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub limit_size: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub limit_file_size: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub limit_lfs_size: f64,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStatistics {
    #[serde_as(as = "DefaultOnNull")]
    pub commit_count: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub repository_size: f64,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permission {
    #[serde_as(as = "DefaultOnNull")]
    pub access_level: u32,
}

/// Access levels the current user holds on a project.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPermission {
    pub project_access: Option<Permission>,
    pub share_group_access: Option<Permission>,
    pub group_access: Option<Permission>,
}

/// A TGit project as returned by the project listing.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    pub description: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub public: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub archived: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub visibility_level: VisibilityLevel,
    #[serde_as(as = "DefaultOnNull")]
    pub public_visibility: i32,
    pub namespace: Option<ProjectNamespace>,
    pub owner: Option<User>,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name_with_namespace: String,
    #[serde_as(as = "DefaultOnNull")]
    pub path: String,
    #[serde_as(as = "DefaultOnNull")]
    pub path_with_namespace: String,
    pub default_branch: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub ssh_url_to_repo: String,
    #[serde_as(as = "DefaultOnNull")]
    pub http_url_to_repo: String,
    #[serde_as(as = "DefaultOnNull")]
    pub https_url_to_repo: String,
    #[serde_as(as = "DefaultOnNull")]
    pub web_url: String,
    #[serde_as(as = "DefaultOnNull")]
    pub tag_list: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub issues_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub merge_requests_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub wiki_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub snippets_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub review_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub fork_enabled: bool,
    pub tag_name_regex: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub tag_create_push_level: i32,
    pub branch_name_regex: Option<String>,
    #[serde(with = "crate::time::option")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(with = "crate::time::option")]
    pub last_activity_at: Option<DateTime<FixedOffset>>,
    #[serde_as(as = "DefaultOnNull")]
    pub creator_id: i64,
    pub avatar_url: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub watchs_count: u32,
    #[serde_as(as = "DefaultOnNull")]
    pub stars_count: u32,
    #[serde_as(as = "DefaultOnNull")]
    pub forks_count: u32,
    pub config_storage: Option<ProjectConfigStorage>,
    pub forked_from_project: Option<String>,
    pub statistics: Option<ProjectStatistics>,
    pub permissions: Option<ProjectPermission>,
    #[serde_as(as = "DefaultOnNull")]
    pub suggestion_reviewers: Vec<Option<String>>,
    #[serde_as(as = "DefaultOnNull")]
    pub necessary_reviewers: Vec<Option<String>>,
    pub path_reviewer_rules: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub approver_rule: i32,
    #[serde_as(as = "DefaultOnNull")]
    pub necessary_approver_rule: i32,
    #[serde_as(as = "DefaultOnNull")]
    pub can_approve_by_creator: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub auto_create_review_after_push: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub forbidden_modify_rule: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub push_reset_enabled: bool,
    pub merge_request_template: Option<String>,
    pub file_owner_path_rules: Option<String>,
}

impl ProjectItem {
    /// Whether the project has a default branch (i.e. is not empty).
    pub fn has_default_branch(&self) -> bool {
        self.default_branch.as_deref().is_some_and(|b| !b.is_empty())
    }
}

#[async_trait]
impl List for ProjectItem {
    type Query = ListProjectsOptions;

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &TgitClient, query: &Self::Query) -> Result<Page<Self>> {
        let (items, response) = client.get_with_query("projects", query).await?;
        Ok(Page::new(items, response))
    }
}
