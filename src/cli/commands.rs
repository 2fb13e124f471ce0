//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Walk paginated Graph-style collections from the command line
#[derive(Parser, Debug)]
#[command(name = "graph-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Access token (falls back to GRAPH_ACCESS_TOKEN)
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every item of a collection, following next links
    Walk {
        /// Collection path or absolute URL (e.g. /users or a saved delta link)
        url: String,

        /// Extra header for every request, as NAME:VALUE
        #[arg(long = "header", value_name = "NAME:VALUE")]
        headers: Vec<String>,

        /// Extra query parameter for every request, as KEY=VALUE
        #[arg(long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,

        /// Stop after this many items
        #[arg(long)]
        max_items: Option<u64>,
    },

    /// Show the effective client configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}
