use crate::client::ApiClient;
use crate::output::{print_json, print_kv, print_table};
use amrflow_core::instance::InstanceRecord;
use amrflow_core::progress::ProgressReport;
use amrflow_core::AmrError;
use clap::Subcommand;
use std::time::Duration;

#[derive(Subcommand)]
pub enum InstanceSubcommand {
    /// Queue a new instance of a stored task
    Assign { task_id: String },
    /// Start (or resume) an instance
    Start { id: String },
    /// Pause an instance
    Pause { id: String },
    /// Cancel an instance after its current action
    Cancel { id: String },
    /// Show an instance's coarse status
    Status { id: String },
    /// List instances
    List,
    /// Poll and re-render the instance list on a fixed interval
    Watch {
        /// Seconds between polls
        #[arg(long, default_value = "5")]
        interval: u64,
    },
    /// Per-action progress breakdown for an instance
    Progress { id: String },
}

pub fn run(client: &ApiClient, subcmd: InstanceSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        InstanceSubcommand::Assign { task_id } => assign(client, &task_id, json),
        InstanceSubcommand::Start { id } => transition(client.start(&id)?, "Started", json),
        InstanceSubcommand::Pause { id } => transition(client.pause(&id)?, "Paused", json),
        InstanceSubcommand::Cancel { id } => transition(client.cancel(&id)?, "Cancelled", json),
        InstanceSubcommand::Status { id } => status(client, &id, json),
        InstanceSubcommand::List => list(client, json),
        InstanceSubcommand::Watch { interval } => watch(client, interval, json),
        InstanceSubcommand::Progress { id } => progress(client, &id, json),
    }
}

fn assign(client: &ApiClient, task_id: &str, json: bool) -> anyhow::Result<()> {
    let instance = client.create_instance(task_id)?;

    if json {
        print_json(&instance)?;
    } else {
        println!(
            "Assigned '{}' to the fleet as instance [{}] ({})",
            instance.task_name(),
            instance.id,
            instance.status
        );
    }
    Ok(())
}

fn transition(instance: InstanceRecord, verb: &str, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&instance)?;
    } else {
        println!("{verb} instance [{}], status {}", instance.id, instance.status);
    }
    Ok(())
}

fn status(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let status = client.refresh_status(id)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "status": status }))?;
    } else {
        println!("{status}");
    }
    Ok(())
}

fn row(instance: &InstanceRecord) -> Vec<String> {
    let progress = match instance.progress() {
        Ok(report) => format!("{}%", report.percentage),
        Err(_) => "-".to_string(),
    };
    // Queued instances belong to the dispatcher and terminal ones are done;
    // only running or paused instances take start/pause/cancel.
    let controls = if instance.status.offers_controls() {
        "start/pause/cancel"
    } else {
        "-"
    };
    vec![
        instance.id.clone(),
        instance.task_name().to_string(),
        instance.status.to_string(),
        progress,
        controls.to_string(),
        instance.updated_at.format("%H:%M:%S").to_string(),
    ]
}

fn render_list(instances: &[InstanceRecord]) {
    if instances.is_empty() {
        println!("No tasks currently assigned.");
        return;
    }
    let rows: Vec<Vec<String>> = instances.iter().map(row).collect();
    print_table(
        &["ID", "TASK", "STATUS", "PROGRESS", "CONTROLS", "UPDATED"],
        &rows,
    );
}

fn list(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let instances = client.list_instances()?;
    if json {
        return print_json(&instances);
    }
    render_list(&instances);
    Ok(())
}

/// Fixed-interval poll. Each round replaces the previous snapshot
/// wholesale; a failed poll is reported and the loop keeps going.
fn watch(client: &ApiClient, interval: u64, json: bool) -> anyhow::Result<()> {
    loop {
        match client.list_instances() {
            Ok(instances) => {
                if json {
                    print_json(&instances)?;
                } else {
                    println!("--- {}", chrono::Utc::now().format("%H:%M:%S"));
                    render_list(&instances);
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
        std::thread::sleep(Duration::from_secs(interval.max(1)));
    }
}

fn progress(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let instance = client.get_instance(id)?;

    let report = match instance.progress() {
        Ok(report) => report,
        Err(AmrError::EmptyWorkflow) | Err(AmrError::TaskNotFound(_)) => {
            if json {
                print_json(&serde_json::json!({ "id": instance.id, "status": instance.status }))?;
            } else {
                println!("No actions available");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        return print_json(&serde_json::json!({
            "id": instance.id,
            "task": instance.task_name(),
            "status": instance.status,
            "progress": report,
        }));
    }

    render_report(&instance, &report);
    Ok(())
}

fn render_report(instance: &InstanceRecord, report: &ProgressReport) {
    print_kv(&[
        ("Task", instance.task_name().to_string()),
        ("Instance", instance.id.clone()),
        ("Status", instance.status.to_string()),
    ]);
    println!();

    let attempted = if instance.status.is_abandoned() {
        "attempted"
    } else {
        "completed"
    };
    println!(
        "Progress: {}% ({} of {} actions {attempted})",
        report.percentage, report.completed, report.total
    );
    if let Some(unexecuted) = report.unexecuted {
        println!(
            "{unexecuted} actions were not executed due to {} task.",
            instance.status.as_str().to_lowercase()
        );
    }
    println!();

    let actions = instance
        .task
        .as_ref()
        .map(|t| t.actions.as_slice())
        .unwrap_or_default();
    let rows: Vec<Vec<String>> = report
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let ty = actions
                .get(i)
                .map(|a| a.action_type.to_string())
                .unwrap_or_else(|| "?".to_string());
            vec![format!("{}", i + 1), ty, step.to_string()]
        })
        .collect();
    print_table(&["#", "ACTION", "STATUS"], &rows);
}
