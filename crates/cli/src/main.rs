//! Customer registry CLI - Database migrations and bulk import.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! registry-cli migrate
//!
//! # Import customers from a YAML file
//! registry-cli import customers.yaml
//!
//! # Import, skipping rejected records instead of stopping
//! registry-cli import customers.yaml --keep-going
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `import` - Create customers from a YAML list

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "registry-cli")]
#[command(author, version, about = "Customer registry CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create customers from a YAML file
    Import {
        /// Path to a YAML list of customer records
        file: PathBuf,

        /// Skip rejected records instead of stopping at the first one
        #[arg(long)]
        keep_going: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Import { file, keep_going } => {
            let summary = commands::import::run(&file, keep_going).await?;
            tracing::info!(
                created = summary.created,
                rejected = summary.rejected,
                "Import finished"
            );
        }
    }
    Ok(())
}
