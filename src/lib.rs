//! TGit API client library.
//!
//! A Rust library for the TGit (git.code.tencent.com) REST API. Every
//! operation goes through one pipeline: the request builder resolves the
//! path against the base URL and encodes options as a query string or JSON
//! body, the configured [`Auth`] scheme adds credentials, the [`Transport`]
//! sends (retrying transient failures), and the decoder turns the response
//! into a typed value plus a [`Response`] envelope carrying pagination
//! headers, or into a [`TgitError`].
//!
//! # Quick Start
//!
//! ```no_run
//! use tgit::{Branch, Get, List, ListProjectsOptions, ListOptions, ProjectItem, TgitClient};
//!
//! #[tokio::main]
//! async fn main() -> tgit::Result<()> {
//!     // Create client from environment variables
//!     let client = TgitClient::from_env()?;
//!
//!     // First page of projects
//!     let query = ListProjectsOptions {
//!         list: ListOptions::for_page(1, 30),
//!         ..Default::default()
//!     };
//!     let page = ProjectItem::list_page(&client, &query).await?;
//!     println!("{} projects in total", page.total());
//!
//!     // A branch of one project
//!     let (branch, _) = Branch::get(&client, ("team/app".into(), "master".to_string())).await?;
//!     println!("master is protected: {}", branch.protected);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Resource operations are expressed as traits on the entity types:
//!
//! - [`Get`] - Fetch a single entity by ID
//! - [`List`] - Fetch paginated collections of entities
//!
//! Operations that do not fit either trait, such as [`compare`] or the
//! repository file writes, are free functions.
//!
//! # Configuration
//!
//! [`TgitClient::from_env`] reads:
//!
//! - `TGIT_TOKEN` - private token, or
//! - `TGIT_OAUTH_TOKEN` - OAuth token, or
//! - `TGIT_USERNAME` and `TGIT_PASSWORD` - basic authentication
//! - `TGIT_API_URL` (optional) - Base URL (defaults to `https://git.code.tencent.com/api/v3/`)

pub mod auth;
pub mod cli;
mod client;
mod error;
mod id;
mod models;
pub mod output;
mod pagination;
mod response;
pub mod time;
mod traits;
pub mod transport;

// Re-export core types
pub use auth::Auth;
pub use client::TgitClient;
pub use error::{normalize_error_message, ApiError, Result, TgitError, UNKNOWN_ERROR_FORMAT};
pub use id::{path_escape, ProjectId};
pub use pagination::{ListOptions, Page, Paginated};
pub use response::Response;
pub use transport::{RetryPolicy, Transport};

// Re-export traits
pub use traits::{Get, List, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    // Project types
    ListProjectsOptions,
    Permission,
    ProjectConfigStorage,
    ProjectItem,
    ProjectNamespace,
    ProjectOrderBy,
    ProjectPermission,
    ProjectStatistics,
    SortOrder,
    VisibilityLevel,
    // Repository types
    Branch,
    Commit,
    CommitRef,
    Compare,
    CompareOptions,
    Diff,
    ListBranchesOptions,
    ListCommitRefsOptions,
    ListCommitsOptions,
    ListTagsOptions,
    Tag,
    // File types
    CreateFileOptions,
    DeleteFileOptions,
    File,
    FileInfo,
    GetFileOptions,
    UpdateFileOptions,
    // Merge request types
    DiffFile,
    ListMergeRequestsOptions,
    MergeRequest,
    MergeRequestReviewer,
    MergeRequestUser,
    Milestone,
    // User types
    User,
};

// Re-export convenience functions
pub use models::{compare, current_user, get_merge_request_changes, list_commit_refs};
pub use models::{create_file, delete_file, get_file, get_raw_file, update_file};
