//! Corebank CLI - Main entry point

mod scenario;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "corebank")]
#[command(about = "Corebank - in-memory ledger and transaction engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in end-to-end demo scenario
    Demo,

    /// Execute a script of JSON operations, one per line
    Run {
        /// Path to the .jsonl script
        script: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Demo => scenario::run_demo(),
        Commands::Run { script } => scenario::run_script(&script)?,
    }
    Ok(())
}
