//! pgstate CLI
//!
//! Plans and applies PostgreSQL / CockroachDB role state from JSON files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pgstate")]
#[command(author, version, about = "pgstate: declarative PostgreSQL role management", long_about = None)]
struct Cli {
    /// Provider configuration file (TOML); PGSTATE_* variables override it
    #[arg(short, long, global = true, env = "PGSTATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and show server and pool details
    Status,

    /// Manage roles
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },
}

#[derive(Subcommand)]
enum RoleAction {
    /// Show planned changes without connecting
    Plan {
        /// Desired state file (JSON)
        #[arg(short, long)]
        desired: PathBuf,

        /// Current state file (JSON)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Create a role
    Create {
        #[arg(short, long)]
        desired: PathBuf,
    },

    /// Refresh a role's state
    Read {
        #[arg(short, long)]
        state: PathBuf,

        /// Desired state file (JSON) to report drift against
        #[arg(short, long)]
        desired: Option<PathBuf>,
    },

    /// Change a role's attributes in place
    Update {
        #[arg(short, long)]
        state: PathBuf,

        #[arg(short, long)]
        desired: PathBuf,
    },

    /// Drop a role
    Delete {
        #[arg(short, long)]
        state: PathBuf,
    },

    /// Adopt an existing role by name
    Import {
        /// Role name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries state JSON
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pgstate={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Status => commands::status::show(config).await?,
        Commands::Role { action } => match action {
            RoleAction::Plan { desired, state } => {
                commands::role::plan(&desired, state.as_deref())?;
            }
            RoleAction::Create { desired } => {
                commands::role::create(config, &desired).await?;
            }
            RoleAction::Read { state, desired } => {
                commands::role::read(config, &state, desired.as_deref()).await?;
            }
            RoleAction::Update { state, desired } => {
                commands::role::update(config, &state, &desired).await?;
            }
            RoleAction::Delete { state } => {
                commands::role::delete(config, &state).await?;
            }
            RoleAction::Import { name } => {
                commands::role::import(config, &name).await?;
            }
        },
    }

    Ok(())
}
