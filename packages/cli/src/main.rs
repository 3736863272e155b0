#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the ufo-map toolchain.
//!
//! Loads a sighting source (local path or URL), runs the cleaning pipeline,
//! and either writes the clean dataset as JSON or prints the summary tables
//! the dashboard shows.
//!
//! Uses `indicatif-log-bridge` (via [`ufo_map_cli_utils::init_logger`]) so
//! log lines and the loading spinner share the terminal cleanly.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ufo_map_ingest::LoadOptions;
use ufo_map_ingest::config::load_mapping;

#[derive(Parser)]
#[command(name = "ufo_map", about = "UFO sighting data cleaning tool")]
struct Cli {
    /// TOML file mapping the source's column headers
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum number of source rows to read
    #[arg(long, global = true)]
    limit: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a source and write the result as JSON
    Clean {
        /// Path or URL of the sighting CSV
        source: String,
        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print descriptive statistics and category counts for a source
    Summary {
        /// Path or URL of the sighting CSV
        source: String,
        /// Only include these shapes (repeatable)
        #[arg(long = "shape")]
        shapes: Vec<String>,
        /// Only include these countries (repeatable)
        #[arg(long = "country")]
        countries: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = ufo_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_mapping(load_mapping(path)?);
    }
    if let Some(limit) = cli.limit {
        options = options.with_limit(limit);
    }

    match cli.command {
        Commands::Clean { source, output } => {
            commands::clean(&multi, &source, &options, output.as_deref()).await?;
        }
        Commands::Summary {
            source,
            shapes,
            countries,
        } => {
            commands::summary(&multi, &source, &options, shapes, countries).await?;
        }
    }

    Ok(())
}
