#![warn(clippy::all)]
#![allow(clippy::pedantic)]

use anyhow::{Context, Result};
use atlas_cli::{execute, load_atlas, Command};
use atlas_common::prelude::{init_logging, AtlasConfig};
use atlas_core::EngineSettings;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

/// `policy-atlas` - reports over a defense-AI policy dataset.
#[derive(Parser, Debug)]
#[command(name = "policy-atlas")]
#[command(version = "0.1.0")]
#[command(about = "Similarity, momentum and timeline reports over a defense-AI policy dataset.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.policy-atlas/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset JSON (overrides ATLAS_DATASET and dataset.path)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn run(cli: Cli) -> Result<()> {
    let config = AtlasConfig::load_and_validate(cli.config.as_deref())?;
    init_logging(&config.observability.log_level, &config.observability.log_format);

    let dataset = cli
        .dataset
        .or_else(|| config.dataset.path.clone())
        .context("No dataset given: pass --dataset, set ATLAS_DATASET or dataset.path")?;

    let atlas = load_atlas(&dataset, EngineSettings::from(&config))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&atlas, &cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<atlas_common::Error>()
            .map_or(1, atlas_common::Error::exit_code);
        std::process::exit(code);
    }
}
