//! localbase CLI entry point.
//!
//! Binary name: `lbase`
//!
//! Parses CLI arguments, resolves the database location, then dispatches
//! to the appropriate command handler.

mod cli;
mod search;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use localbase_infra::sqlite::pool::{default_data_dir, default_database_url};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,localbase=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need a database
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "lbase", &mut std::io::stdout());
        return Ok(());
    }

    let database_url = match &cli.db {
        Some(path) => format!("sqlite://{}", path.display()),
        None => {
            std::fs::create_dir_all(default_data_dir())?;
            default_database_url()
        }
    };

    match cli.command {
        Commands::Search {
            func,
            embedding,
            threshold,
            limit,
        } => search::run(&database_url, &func, &embedding, threshold, limit).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
