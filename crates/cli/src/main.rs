//! codeact CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Initialize config and knowledge directory
//! - `run`      — Run a task through the agent loop
//! - `doctor`   — Diagnose system health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "codeact",
    about = "codeact — autonomous code-acting agent runtime",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and knowledge directory
    Onboard,

    /// Run a task through the agent loop
    Run {
        /// The task to accomplish
        task: String,

        /// Path to an alternate config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },

    /// Diagnose system health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Run { task, config } => commands::run::run(&task, config.as_deref()).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
