use crate::output::{print_json, print_table};
use amrflow_core::action::ConfigValue;
use amrflow_core::registry;
use amrflow_core::types::ActionType;
use amrflow_core::workflow::Composer;
use anyhow::{bail, Context};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Draft file
// ---------------------------------------------------------------------------

/// On-disk form of a workflow under composition. The composer's selection
/// travels with the file so every command sees the state the previous one
/// left behind.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub composer: Composer,
}

pub fn load_draft(path: &Path) -> anyhow::Result<Draft> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read draft '{}'", path.display()))?;
    serde_yaml::from_str(&data)
        .with_context(|| format!("cannot parse draft '{}'", path.display()))
}

pub fn save_draft(path: &Path, draft: &Draft) -> anyhow::Result<()> {
    let data = serde_yaml::to_string(draft)?;
    std::fs::write(path, data)
        .with_context(|| format!("cannot write draft '{}'", path.display()))
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ComposeSubcommand {
    /// Start an empty workflow draft
    New {
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Append an action (MOVE, LATCH, REVERSE, "WAIT FOR TRIGGER", ...)
    Add { file: PathBuf, action_type: String },
    /// Move the action at FROM so it lands at position TO
    Move {
        file: PathBuf,
        from: usize,
        to: usize,
    },
    /// Remove the action at INDEX
    Rm { file: PathBuf, index: usize },
    /// Set config fields (key=value) on the selected or indexed action
    Set {
        file: PathBuf,
        /// Target action (defaults to the selected one)
        #[arg(long)]
        index: Option<usize>,
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Merge a named reverse preset into the selected or indexed action
    Preset {
        file: PathBuf,
        preset: String,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Select the action at INDEX for subsequent edits
    Select { file: PathBuf, index: usize },
    /// Show the draft
    Show { file: PathBuf },
    /// Validate every action and report what is missing
    Check { file: PathBuf },
}

pub fn run(subcmd: ComposeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ComposeSubcommand::New {
            file,
            name,
            description,
        } => new(&file, name, description, json),
        ComposeSubcommand::Add { file, action_type } => add(&file, &action_type, json),
        ComposeSubcommand::Move { file, from, to } => move_item(&file, from, to, json),
        ComposeSubcommand::Rm { file, index } => rm(&file, index, json),
        ComposeSubcommand::Set {
            file,
            index,
            fields,
        } => set(&file, index, &fields, json),
        ComposeSubcommand::Preset {
            file,
            preset,
            index,
        } => apply_preset(&file, &preset, index, json),
        ComposeSubcommand::Select { file, index } => select(&file, index, json),
        ComposeSubcommand::Show { file } => show(&file, json),
        ComposeSubcommand::Check { file } => check(&file, json),
    }
}

fn new(
    path: &Path,
    name: Option<String>,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    if path.exists() {
        bail!("draft '{}' already exists", path.display());
    }
    let draft = Draft {
        name,
        description,
        composer: Composer::new(),
    };
    save_draft(path, &draft)?;

    if json {
        print_json(&serde_json::json!({ "draft": path, "actions": 0 }))?;
    } else {
        println!("Created draft {}", path.display());
    }
    Ok(())
}

fn add(path: &Path, action_type: &str, json: bool) -> anyhow::Result<()> {
    let ty: ActionType = action_type.parse()?;
    let mut draft = load_draft(path)?;
    let index = draft.composer.add(ty);
    save_draft(path, &draft)?;

    if json {
        print_json(&serde_json::json!({ "index": index, "type": ty.as_str(), "selected": index }))?;
    } else {
        println!("Added {ty} at position {index} (selected)");
    }
    Ok(())
}

fn move_item(path: &Path, from: usize, to: usize, json: bool) -> anyhow::Result<()> {
    let mut draft = load_draft(path)?;
    draft.composer.move_item(from, to)?;
    save_draft(path, &draft)?;

    if json {
        print_json(&serde_json::json!({ "from": from, "to": to, "selected": to }))?;
    } else {
        println!("Moved action {from} -> {to}");
    }
    Ok(())
}

fn rm(path: &Path, index: usize, json: bool) -> anyhow::Result<()> {
    let mut draft = load_draft(path)?;
    let removed = draft.composer.remove(index)?;
    save_draft(path, &draft)?;

    if json {
        print_json(&serde_json::json!({ "removed": removed.action_type.as_str(), "index": index }))?;
    } else {
        println!("Removed {} from position {index}", removed.action_type);
    }
    Ok(())
}

/// Resolve the action a `set`/`preset` targets: explicit `--index` wins,
/// otherwise the draft's selection.
fn target_index(draft: &Draft, index: Option<usize>) -> anyhow::Result<usize> {
    index
        .or(draft.composer.selected)
        .context("no action selected; pass --index or select one first")
}

fn set(path: &Path, index: Option<usize>, fields: &[String], json: bool) -> anyhow::Result<()> {
    let mut draft = load_draft(path)?;
    let index = target_index(&draft, index)?;
    let action = draft
        .composer
        .workflow
        .get(index)
        .with_context(|| format!("no action at position {index}"))?;

    // Build the replacement config from the current one plus the edits,
    // then swap it in wholesale.
    let mut config = action.config.clone();
    for pair in fields {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected key=value, got '{pair}'"))?;
        config.insert(key.to_string(), ConfigValue::parse(value));
    }
    draft.composer.update_config(index, config)?;
    save_draft(path, &draft)?;

    if json {
        print_json(&serde_json::json!({ "index": index, "updated": fields.len() }))?;
    } else {
        println!("Updated action {index} ({} fields)", fields.len());
    }
    Ok(())
}

fn apply_preset(path: &Path, name: &str, index: Option<usize>, json: bool) -> anyhow::Result<()> {
    let mut draft = load_draft(path)?;
    let index = target_index(&draft, index)?;
    let catalog = amrflow_core::preset::PresetCatalog::default();
    draft.composer.apply_preset(index, &catalog, name)?;
    save_draft(path, &draft)?;

    if json {
        print_json(&serde_json::json!({ "index": index, "preset": name }))?;
    } else {
        println!("Applied preset '{name}' to action {index}");
    }
    Ok(())
}

fn select(path: &Path, index: usize, json: bool) -> anyhow::Result<()> {
    let mut draft = load_draft(path)?;
    draft.composer.select(index)?;
    save_draft(path, &draft)?;

    if json {
        print_json(&serde_json::json!({ "selected": index }))?;
    } else {
        println!("Selected action {index}");
    }
    Ok(())
}

fn summarize_config(action: &amrflow_core::action::Action) -> String {
    if action.config.is_empty() {
        return "-".to_string();
    }
    action
        .config
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn show(path: &Path, json: bool) -> anyhow::Result<()> {
    let draft = load_draft(path)?;
    if json {
        return print_json(&draft);
    }

    if let Some(name) = &draft.name {
        println!("Name: {name}");
    }
    let workflow = &draft.composer.workflow;
    if workflow.is_empty() {
        println!("(empty draft; add actions with 'compose add')");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = workflow
        .actions()
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let marker = if draft.composer.selected == Some(i) {
                "*"
            } else {
                ""
            };
            let valid = if registry::is_valid(a.action_type, &a.config) {
                "ok"
            } else {
                "incomplete"
            };
            vec![
                format!("{i}{marker}"),
                a.action_type.to_string(),
                valid.to_string(),
                summarize_config(a),
            ]
        })
        .collect();
    print_table(&["#", "ACTION", "VALID", "CONFIG"], &rows);
    println!();
    println!(
        "Submittable: {}",
        if workflow.is_submittable() { "yes" } else { "no" }
    );
    Ok(())
}

fn check(path: &Path, json: bool) -> anyhow::Result<()> {
    let draft = load_draft(path)?;
    let workflow = &draft.composer.workflow;

    let problems: Vec<(usize, String, Vec<&str>)> = workflow
        .actions()
        .iter()
        .enumerate()
        .filter_map(|(i, a)| {
            let missing = registry::missing_fields(a.action_type, &a.config);
            (!missing.is_empty()).then(|| (i, a.action_type.to_string(), missing))
        })
        .collect();

    if json {
        print_json(&serde_json::json!({
            "actions": workflow.len(),
            "submittable": workflow.is_submittable(),
            "problems": problems
                .iter()
                .map(|(i, ty, missing)| serde_json::json!({
                    "index": i, "type": ty, "missing": missing,
                }))
                .collect::<Vec<_>>(),
        }))?;
    } else {
        for (i, ty, missing) in &problems {
            println!("{i}. {ty} missing: {}", missing.join(", "));
        }
    }

    // An unsubmittable draft is a failed check.
    workflow.validate()?;
    if !json {
        println!("Workflow is submittable ({} actions)", workflow.len());
    }
    Ok(())
}
