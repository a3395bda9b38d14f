use crate::client::ApiClient;
use crate::cmd::compose;
use crate::output::{print_json, print_table};
use amrflow_core::task::TaskDraft;
use amrflow_core::workflow::Workflow;
use anyhow::Context;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Submit a composed draft as a new task
    Submit {
        file: PathBuf,
        /// Task name (falls back to the draft's name)
        #[arg(long)]
        name: Option<String>,
        /// Task description (falls back to the draft's description)
        #[arg(long)]
        description: Option<String>,
    },
    /// List stored tasks
    List,
    /// Delete a stored task
    Delete { id: String },
}

pub fn run(client: &ApiClient, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Submit {
            file,
            name,
            description,
        } => submit(client, &file, name, description, json),
        TaskSubcommand::List => list(client, json),
        TaskSubcommand::Delete { id } => delete(client, &id, json),
    }
}

fn submit(
    client: &ApiClient,
    file: &std::path::Path,
    name: Option<String>,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let draft_file = compose::load_draft(file)?;
    let name = name
        .or(draft_file.name)
        .context("task name required; pass --name or set it in the draft")?;
    let description = description.or(draft_file.description).unwrap_or_default();

    // from_workflow runs the full validity check, so an incomplete draft
    // fails here instead of reaching the service.
    let workflow: &Workflow = &draft_file.composer.workflow;
    let draft = TaskDraft::from_workflow(name, description, workflow)?;
    let task = client.create_task(&draft)?;

    if json {
        print_json(&task)?;
    } else {
        println!("Submitted task '{}' [{}]", task.name, task.id);
    }
    Ok(())
}

fn list(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let tasks = client.list_tasks()?;

    if json {
        return print_json(&tasks);
    }

    if tasks.is_empty() {
        println!("No tasks available.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.name.clone(),
                t.actions.len().to_string(),
                t.description.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "ACTIONS", "DESCRIPTION"], &rows);
    Ok(())
}

fn delete(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    client.delete_task(id)?;

    if json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("Deleted task [{id}]");
    }
    Ok(())
}
