use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "aitrace", version, about = "Price LLM usage and keep per-project aggregates")]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the config file, data dir and database
    Init,
    /// Price a usage payload without recording it
    Quote {
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        model: Option<String>,
        /// JSON usage block, or `-` for stdin
        #[arg(long)]
        usage: PathBuf,
    },
    /// Record a log-step payload
    LogStep {
        /// JSON payload, or `-` for stdin
        #[arg(long)]
        payload: PathBuf,
    },
    /// Record a log-trace payload
    LogTrace {
        /// JSON payload, or `-` for stdin
        #[arg(long)]
        payload: PathBuf,
    },
    /// Show one project's aggregates
    Project { name: String },
    /// List all projects
    Projects,
    /// List priced models, or write the active catalog to a file
    Catalog {
        #[arg(long)]
        export: Option<PathBuf>,
    },
}
