//! Hearth command-line front end.
//!
//! Usage:
//!   hearth import --file statement.csv [--config hearth.toml] [--existing stored.json]
//!   hearth duplicates --existing stored.json [--ignore ignored.json] [--dismiss 0 2]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

/// Hearth - bank statement import and reconciliation
#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Import bank statements and find duplicate transactions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a statement and print the transactions that are not on record yet
    Import {
        /// Statement file (csv, txt, xlsx, xls, xlsm, ods)
        #[arg(short, long)]
        file: PathBuf,

        /// Settings file (TOML): hints, rules, categories, utc offset
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Transactions already on record (JSON array)
        #[arg(short, long)]
        existing: Option<PathBuf>,
    },

    /// Cluster stored transactions into likely duplicate groups
    Duplicates {
        /// Transactions already on record (JSON array)
        #[arg(short, long)]
        existing: PathBuf,

        /// Persisted "not a duplicate" pair keys (JSON array)
        #[arg(short, long)]
        ignore: Option<PathBuf>,

        /// Group indices to mark as "not a duplicate"; rewrites the ignore file
        #[arg(short, long, num_args = 1.., requires = "ignore")]
        dismiss: Vec<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose; logs go to stderr, JSON to stdout
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Import { file, config, existing } => {
            commands::cmd_import(&file, config.as_deref(), existing.as_deref())
        }
        Commands::Duplicates { existing, ignore, dismiss } => {
            commands::cmd_duplicates(&existing, ignore.as_deref(), &dismiss)
        }
    }
}
