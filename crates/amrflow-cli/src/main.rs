mod client;
mod cmd;
mod output;

use clap::{Parser, Subcommand};
use client::ApiClient;
use cmd::{
    catalog::CatalogSubcommand, compose::ComposeSubcommand, instance::InstanceSubcommand,
    task::TaskSubcommand,
};

#[derive(Parser)]
#[command(
    name = "amrflow",
    about = "Compose AMR task workflows, submit them, and track instance progress",
    version,
    propagate_version = true
)]
struct Cli {
    /// Task service base URL
    #[arg(
        long,
        global = true,
        env = "AMRFLOW_API",
        default_value = "http://localhost:5000"
    )]
    api: String,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit a workflow draft file
    Compose {
        #[command(subcommand)]
        subcommand: ComposeSubcommand,
    },

    /// Submit, list, and delete tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Control and observe task instances
    Instance {
        #[command(subcommand)]
        subcommand: InstanceSubcommand,
    },

    /// Browse the site vocabulary (locations, signals, presets, ...)
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },

    /// Run the task service with a simulated executor fleet
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Number of simulated AMRs
        #[arg(long, default_value = "2")]
        fleet: usize,

        /// Seconds between dispatcher rounds
        #[arg(long, default_value = "60")]
        tick: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Compose { subcommand } => cmd::compose::run(subcommand, cli.json),
        Commands::Task { subcommand } => {
            cmd::task::run(&ApiClient::new(&cli.api), subcommand, cli.json)
        }
        Commands::Instance { subcommand } => {
            cmd::instance::run(&ApiClient::new(&cli.api), subcommand, cli.json)
        }
        Commands::Catalog { subcommand } => cmd::catalog::run(subcommand, cli.json),
        Commands::Serve { port, fleet, tick } => cmd::serve::run(port, fleet, tick),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
