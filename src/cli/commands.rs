//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rakuten Advertising report connector CLI
#[derive(Parser, Debug)]
#[command(name = "rakuten-connector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate credentials against the reporting API (no rows are read)
    Check,

    /// Discover configured streams and print the catalog
    Discover,

    /// Extract rows, emitting schema/record/state messages to stdout
    Sync {
        /// Catalog file with stream selections (defaults to discovering
        /// all configured streams)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Streams to sync (comma-separated stream ids, empty = all)
        #[arg(long)]
        streams: Option<String>,
    },
}
