//! Repository files: read, raw download, create, update and delete.

use std::io::Write;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::TgitClient;
use crate::error::Result;
use crate::id::ProjectId;
use crate::response::Response;

/// A file read from the repository.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    #[serde_as(as = "DefaultOnNull")]
    pub file_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub file_path: String,
    #[serde_as(as = "DefaultOnNull")]
    pub size: u64,
    /// `base64` or `text`.
    #[serde_as(as = "DefaultOnNull")]
    pub encoding: String,
    #[serde_as(as = "DefaultOnNull")]
    pub content: String,
    #[serde(rename = "ref")]
    #[serde_as(as = "DefaultOnNull")]
    pub git_ref: String,
    #[serde_as(as = "DefaultOnNull")]
    pub blob_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub commit_id: String,
}

/// Result of a file write operation.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    #[serde_as(as = "DefaultOnNull")]
    pub file_path: String,
    pub file_name: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub branch_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetFileOptions {
    pub file_path: String,
    /// Branch, tag or commit; the default branch when unset.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

impl GetFileOptions {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            git_ref: None,
        }
    }

    #[must_use]
    pub fn at(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }
}

/// Body for creating a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateFileOptions {
    pub file_path: String,
    pub branch_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    pub content: String,
    pub commit_message: String,
}

/// Body for replacing a file's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFileOptions {
    pub file_path: String,
    pub branch_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    pub content: String,
    pub commit_message: String,
}

/// Body for deleting a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteFileOptions {
    pub file_path: String,
    pub branch_name: String,
    pub commit_message: String,
}

#[derive(Debug, Serialize)]
struct RawFileQuery<'a> {
    filepath: &'a str,
}

fn files_path(project: &ProjectId) -> String {
    format!("projects/{}/repository/files", project.escaped())
}

/// Read a file, including its (usually base64) content.
#[tracing::instrument(skip(client))]
pub async fn get_file(
    client: &TgitClient,
    project: &ProjectId,
    options: &GetFileOptions,
) -> Result<(File, Response)> {
    client.get_with_query(&files_path(project), options).await
}

/// Stream the raw content of a file at `git_ref` into `writer`.
#[tracing::instrument(skip(client, writer))]
pub async fn get_raw_file<W>(
    client: &TgitClient,
    project: &ProjectId,
    git_ref: &str,
    file_path: &str,
    writer: &mut W,
) -> Result<Response>
where
    W: Write + Send + ?Sized,
{
    let path = format!(
        "projects/{}/repository/blobs/{}",
        project.escaped(),
        urlencoding::encode(git_ref)
    );
    let query = RawFileQuery { filepath: file_path };

    let request = client.new_request(Method::GET, &path, Some(&query))?;
    client.execute_to_writer(request, writer).await
}

#[tracing::instrument(skip(client, options), fields(file_path = %options.file_path))]
pub async fn create_file(
    client: &TgitClient,
    project: &ProjectId,
    options: &CreateFileOptions,
) -> Result<(FileInfo, Response)> {
    client.post(&files_path(project), options).await
}

#[tracing::instrument(skip(client, options), fields(file_path = %options.file_path))]
pub async fn update_file(
    client: &TgitClient,
    project: &ProjectId,
    options: &UpdateFileOptions,
) -> Result<(FileInfo, Response)> {
    client.put(&files_path(project), options).await
}

#[tracing::instrument(skip(client))]
pub async fn delete_file(
    client: &TgitClient,
    project: &ProjectId,
    options: &DeleteFileOptions,
) -> Result<(FileInfo, Response)> {
    client.delete(&files_path(project), options).await
}
