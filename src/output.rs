//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Branch, Commit, File, MergeRequest, Tag, User};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

impl PrettyPrint for Branch {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Branch: {}", self.name));
        lines.push(format!(
            "Protected:      {}",
            if self.protected { "yes" } else { "no" }
        ));

        if let Some(ref commit) = self.commit {
            lines.push(format!("Commit:         {} {}", commit.short_id, commit.title));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Tag {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Tag: {}", self.name));

        if let Some(ref message) = self.message {
            if !message.is_empty() {
                lines.push(format!("Message:        {}", message));
            }
        }
        if let Some(ref commit) = self.commit {
            lines.push(format!("Commit:         {} {}", commit.short_id, commit.title));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Commit {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Commit: {}", self.id));
        lines.push(format!("Author:         {} <{}>", self.author_name, self.author_email));

        if let Some(ref date) = self.committed_date {
            lines.push(format!("Committed:      {}", date.format(TIME_FORMAT)));
        }
        if self.is_merge() {
            lines.push(format!("Parents:        {}", self.parent_ids.join(", ")));
        }
        lines.push(String::new());
        lines.push(self.message.trim_end().to_string());

        lines.join("\n")
    }
}

impl PrettyPrint for MergeRequest {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Merge request !{}: {}", self.iid, self.title));
        lines.push(format!("State:          {}", self.state));
        lines.push(format!(
            "Branches:       {} -> {}",
            self.source_branch, self.target_branch
        ));

        if let Some(ref author) = self.author {
            lines.push(format!("Author:         {}", author.username));
        }
        if !self.files.is_empty() {
            let (added, removed) = self.line_changes();
            lines.push(format!(
                "Changes:        {} files, +{} -{}",
                self.files.len(),
                added,
                removed
            ));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("User: {}", self.username));
        lines.push(format!("Name:           {}", self.name));
        lines.push(format!("State:          {}", self.state));

        if !self.email.is_empty() {
            lines.push(format!("Email:          {}", self.email));
        }
        if self.is_admin {
            lines.push("Admin:          yes".to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for File {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("File: {}", self.file_path));
        lines.push(format!("Ref:            {}", self.git_ref));
        lines.push(format!("Size:           {} bytes", self.size));
        lines.push(format!("Encoding:       {}", self.encoding));
        lines.push(format!("Blob:           {}", self.blob_id));

        lines.join("\n")
    }
}
