//! CLI module for GSurvWeb
//!
//! Startup flags:
//! - `--develop` / `-d`: developer mode with beta features
//! - `--path_to_data` / `-p`: local workbook, developer mode only
//! - `--verbose` / `-v`: detailed session status logging
//!
//! Subcommands:
//! - `serve`: start the web server (default)
//! - `inspect`: parse a workbook and print its sheets

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gsurv_core::RunSettings;
use std::path::PathBuf;
use tracing::info;

pub mod inspect;

/// GSurvWeb command line
#[derive(Parser, Debug)]
#[command(name = "gsurvweb")]
#[command(about = "Interactive web application for transplant graft survival prediction")]
#[command(version)]
pub struct Cli {
    /// Run developer mode with beta features included
    #[arg(short = 'd', long = "develop", global = true)]
    pub develop: bool,

    /// Provide path to data in development mode
    #[arg(short = 'p', long = "path_to_data", value_name = "PATH", global = true)]
    pub path_to_data: Option<PathBuf>,

    /// Print detailed session status on the command line
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    Serve,
    /// Parse a workbook and print its sheet summary
    Inspect {
        /// Workbook to parse
        file: PathBuf,
    },
}

impl Cli {
    /// Orchestrator settings implied by the flags
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            dev_mode: self.develop,
            local_data_path: self.path_to_data.clone(),
            verbose: self.verbose,
        }
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    info!(
        develop = cli.develop,
        path_to_data = ?cli.path_to_data,
        verbose = cli.verbose,
        "Running command line arguments"
    );

    let settings = cli.run_settings();
    settings
        .validate()
        .context("Refusing to start with inconsistent flags")?;

    match cli.command {
        Some(Commands::Inspect { file }) => inspect::run(&file),
        Some(Commands::Serve) | None => crate::server::run(settings).await,
    }
}
