//! CLI argument definitions for the `lbase` binary.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use localbase_core::search::{DEFAULT_MATCH_COUNT, DEFAULT_MATCH_THRESHOLD};

/// Local, file-backed document store with similarity search.
#[derive(Parser)]
#[command(name = "lbase", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the SQLite database file (default: $LOCALBASE_DATA_DIR/localbase.db).
    #[arg(long, global = true, env = "LOCALBASE_DB")]
    pub db: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a similarity search RPC and print the matching rows as JSON.
    Search {
        /// RPC function name (e.g. search_sessions).
        #[arg(long)]
        func: String,

        /// Query embedding as a JSON array of numbers.
        #[arg(long)]
        embedding: String,

        /// Similarity threshold; rows must strictly exceed it.
        #[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
        threshold: f64,

        /// Maximum number of rows returned.
        #[arg(long, default_value_t = DEFAULT_MATCH_COUNT)]
        limit: usize,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
