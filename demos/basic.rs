//! Basic example demonstrating the TGit API client.
//!
//! Run with:
//! ```
//! TGIT_TOKEN=your-token cargo run --example basic -- team/app
//! ```

use tgit::{
    compare, current_user, get_file, Branch, CompareOptions, Get, GetFileOptions, List,
    ListBranchesOptions, ListOptions, ListProjectsOptions, ProjectId, ProjectItem, TgitClient,
};

#[tokio::main]
async fn main() -> tgit::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating TGit client...");
    let client = TgitClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    let (me, _) = current_user(&client).await?;
    println!("Authenticated as {} ({})", me.username, me.name);

    // List first page of projects
    println!("\n--- Listing Projects (first page) ---");
    let query = ListProjectsOptions {
        list: ListOptions::for_page(1, 10),
        ..Default::default()
    };
    let projects = ProjectItem::list_page(&client, &query).await?;
    println!(
        "Found {} projects (total: {}, pages: {})",
        projects.len(),
        projects.total(),
        projects.response.total_pages
    );
    for project in &projects {
        println!("  - {} ({})", project.path_with_namespace, project.id);
    }

    // Work on the project named on the command line, or the first listed one
    let project: ProjectId = match std::env::args().nth(1) {
        Some(arg) => arg.into(),
        None => match projects.items.first() {
            Some(first) => first.id.into(),
            None => {
                println!("\nNo projects visible to this token.");
                return Ok(());
            }
        },
    };

    println!("\n--- Branches of {project} ---");
    let query = (project.clone(), ListBranchesOptions::default());
    let branches = Branch::list_all(&client, &query).await?;
    for branch in branches.iter().take(10) {
        println!(
            "  - {}{}",
            branch.name,
            if branch.protected { " (protected)" } else { "" }
        );
    }

    if let Some(first) = branches.first() {
        let (branch, _) = Branch::get(&client, (project.clone(), first.name.clone())).await?;
        if let Some(commit) = branch.commit {
            println!("\n{} points at {} {}", branch.name, commit.short_id, commit.title);
        }

        let options = GetFileOptions::new("README.md").at(&branch.name);
        match get_file(&client, &project, &options).await {
            Ok((file, _)) => println!("README.md is {} bytes ({})", file.size, file.encoding),
            Err(e) => println!("No README.md on {}: {e}", branch.name),
        }

        if branches.len() > 1 {
            let options = CompareOptions::new(&branches[1].name, &branch.name);
            let (cmp, _) = compare(&client, &project, &options).await?;
            println!(
                "\n{} -> {}: {} commits, {} files changed",
                branches[1].name, branch.name, cmp.commits_total, cmp.files_total
            );
        }
    }

    println!("\nDone!");
    Ok(())
}
