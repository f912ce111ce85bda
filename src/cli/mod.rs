//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the tgit binary.

use clap::{Parser, Subcommand, ValueEnum};

/// TGit API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "tgit", about = "TGit API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Base URL of the TGit instance.
    #[arg(long, global = true, env = "TGIT_API_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// Project ID or path; for users, the username (omit for yourself).
        target: Option<String>,

        /// Branch, tag, commit SHA, merge request ID or file path, depending on the entity.
        name: Option<String>,

        /// Ref to read a file at.
        #[arg(long = "ref")]
        git_ref: Option<String>,
    },

    /// List entities with pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Project ID or path (required for everything except projects).
        project: Option<String>,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        per_page: Option<u32>,

        /// Free-text filter (projects only).
        #[arg(long)]
        search: Option<String>,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A project.
    #[value(alias = "projects")]
    Project,
    /// A repository branch.
    #[value(alias = "branches")]
    Branch,
    /// A repository tag.
    #[value(alias = "tags")]
    Tag,
    /// A commit.
    #[value(alias = "commits")]
    Commit,
    /// A merge request.
    #[value(alias = "merge-requests", alias = "mr")]
    MergeRequest,
    /// A user.
    #[value(alias = "users")]
    User,
    /// A repository file.
    #[value(alias = "files")]
    File,
}
