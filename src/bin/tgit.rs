//! TGit API CLI binary.
//!
//! A command-line interface for interacting with the TGit API.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tabled::{Table, Tabled};
use tgit::cli::{Cli, Command, Entity};
use tgit::output::PrettyPrint;
use tgit::{
    current_user, get_file, get_merge_request_changes, Branch, Commit, Get, GetFileOptions, List, ListBranchesOptions,
    ListCommitsOptions, ListMergeRequestsOptions, ListOptions, ListProjectsOptions,
    ListTagsOptions, MergeRequest, Page, ProjectId, ProjectItem, Tag, TgitClient, TgitError, User,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set TGIT_TOKEN (or TGIT_OAUTH_TOKEN, or TGIT_USERNAME and TGIT_PASSWORD)");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> tgit::Result<TgitClient> {
    let client = TgitClient::from_env()?;
    match cli.url.as_deref() {
        Some(url) => client.with_base_url(url),
        None => Ok(client),
    }
}

async fn run(client: &TgitClient, cli: Cli) -> tgit::Result<()> {
    match cli.command {
        Command::Get {
            entity,
            target,
            name,
            git_ref,
        } => handle_get(client, entity, target, name, git_ref, cli.json).await,
        Command::List {
            entity,
            project,
            page,
            per_page,
            search,
        } => {
            let list = ListOptions {
                page: Some(page.unwrap_or(1)),
                per_page: Some(per_page.unwrap_or(20)),
            };
            handle_list(client, entity, project, list, search, cli.json).await
        }
    }
}

fn project_arg(entity: Entity, project: Option<String>) -> tgit::Result<ProjectId> {
    let project = project.ok_or_else(|| {
        TgitError::InvalidArgument(format!("a project ID or path is required for {entity:?}"))
    })?;
    match project.parse::<ProjectId>() {
        Ok(id) => Ok(id),
        Err(never) => match never {},
    }
}

fn name_arg(entity: Entity, name: Option<String>) -> tgit::Result<String> {
    name.ok_or_else(|| TgitError::InvalidArgument(format!("a name is required for {entity:?}")))
}

async fn handle_get(
    client: &TgitClient,
    entity: Entity,
    target: Option<String>,
    name: Option<String>,
    git_ref: Option<String>,
    json: bool,
) -> tgit::Result<()> {
    match entity {
        Entity::Branch => {
            let project = project_arg(entity, target)?;
            let (branch, _) = Branch::get(client, (project, name_arg(entity, name)?)).await?;
            output_single(&branch, json)
        }
        Entity::Tag => {
            let project = project_arg(entity, target)?;
            let (tag, _) = Tag::get(client, (project, name_arg(entity, name)?)).await?;
            output_single(&tag, json)
        }
        Entity::Commit => {
            let project = project_arg(entity, target)?;
            let (commit, _) = Commit::get(client, (project, name_arg(entity, name)?)).await?;
            output_single(&commit, json)
        }
        Entity::User => {
            let (user, _) = match target {
                Some(username) => User::get(client, username).await?,
                None => current_user(client).await?,
            };
            output_single(&user, json)
        }
        Entity::File => {
            let project = project_arg(entity, target)?;
            let mut options = GetFileOptions::new(name_arg(entity, name)?);
            options.git_ref = git_ref;
            let (file, _) = get_file(client, &project, &options).await?;
            output_single(&file, json)
        }
        Entity::MergeRequest => {
            let project = project_arg(entity, target)?;
            let id = name_arg(entity, name)?;
            let id: i64 = id.parse().map_err(|_| {
                TgitError::InvalidArgument(format!("merge request ID must be an integer, got {id:?}"))
            })?;
            let (merge_request, _) = get_merge_request_changes(client, &project, id).await?;
            output_single(&merge_request, json)
        }
        Entity::Project => Err(TgitError::InvalidArgument(
            "projects can only be listed; use 'tgit list projects'".to_string(),
        )),
    }
}

async fn handle_list(
    client: &TgitClient,
    entity: Entity,
    project: Option<String>,
    list: ListOptions,
    search: Option<String>,
    json: bool,
) -> tgit::Result<()> {
    match entity {
        Entity::Project => {
            let query = ListProjectsOptions {
                list,
                search,
                ..Default::default()
            };
            let page = ProjectItem::list_page(client, &query).await?;
            output_page(&page, json, |item| ProjectRow::from(item))
        }
        Entity::Branch => {
            let query = (project_arg(entity, project)?, ListBranchesOptions { list });
            let page = Branch::list_page(client, &query).await?;
            output_page(&page, json, |item| BranchRow::from(item))
        }
        Entity::Tag => {
            let query = (project_arg(entity, project)?, ListTagsOptions { list });
            let page = Tag::list_page(client, &query).await?;
            output_page(&page, json, |item| TagRow::from(item))
        }
        Entity::Commit => {
            let query = (
                project_arg(entity, project)?,
                ListCommitsOptions {
                    list,
                    ..Default::default()
                },
            );
            let page = Commit::list_page(client, &query).await?;
            output_page(&page, json, |item| CommitRow::from(item))
        }
        Entity::MergeRequest => {
            let query = (
                project_arg(entity, project)?,
                ListMergeRequestsOptions {
                    list,
                    ..Default::default()
                },
            );
            let page = MergeRequest::list_page(client, &query).await?;
            output_page(&page, json, |item| MergeRequestRow::from(item))
        }
        Entity::User | Entity::File => Err(TgitError::InvalidArgument(format!(
            "{entity:?} cannot be listed; use 'tgit get'"
        ))),
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> tgit::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> tgit::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
        return Ok(());
    }

    let rows: Vec<R> = page.items.iter().map(to_row).collect();
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", Table::new(rows))?;

    let envelope = &page.response;
    if envelope.total_pages > 0 {
        writeln!(
            stdout,
            "\nPage {}/{} ({} total items)",
            envelope.current_page, envelope.total_pages, envelope.total_items
        )?;
    } else if page.has_more() {
        writeln!(stdout, "\nPage {} (more available)", envelope.current_page)?;
    } else {
        writeln!(stdout, "\nPage {} (end)", envelope.current_page)?;
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectRow {
    id: i64,
    path: String,
    visibility: String,
    default_branch: String,
}

impl From<&ProjectItem> for ProjectRow {
    fn from(p: &ProjectItem) -> Self {
        Self {
            id: p.id,
            path: p.path_with_namespace.clone(),
            visibility: p.visibility_level.to_string(),
            default_branch: p.default_branch.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct BranchRow {
    name: String,
    protected: bool,
    commit: String,
}

impl From<&Branch> for BranchRow {
    fn from(b: &Branch) -> Self {
        Self {
            name: b.name.clone(),
            protected: b.protected,
            commit: b
                .commit
                .as_ref()
                .map(|c| c.short_id.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct TagRow {
    name: String,
    commit: String,
}

impl From<&Tag> for TagRow {
    fn from(t: &Tag) -> Self {
        Self {
            name: t.name.clone(),
            commit: t
                .commit
                .as_ref()
                .map(|c| c.short_id.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct CommitRow {
    sha: String,
    author: String,
    title: String,
}

impl From<&Commit> for CommitRow {
    fn from(c: &Commit) -> Self {
        Self {
            sha: c.short_id.clone(),
            author: c.author_name.clone(),
            title: c.title.clone(),
        }
    }
}

#[derive(Tabled)]
struct MergeRequestRow {
    iid: i64,
    state: String,
    title: String,
    #[tabled(rename = "source -> target")]
    branches: String,
}

impl From<&MergeRequest> for MergeRequestRow {
    fn from(m: &MergeRequest) -> Self {
        Self {
            iid: m.iid,
            state: m.state.clone(),
            title: m.title.clone(),
            branches: format!("{} -> {}", m.source_branch, m.target_branch),
        }
    }
}
