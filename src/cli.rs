//! Command-line interface module for autosort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading and command-line overrides
//! - Sort and restore orchestration
//! - Report rendering

use crate::config::{ConfigError, SortConfig};
use crate::output::OutputFormatter;
use crate::restorer::Restorer;
use crate::sorter::{SortError, Sorter};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sort research files into category folders by filename keywords.
#[derive(Parser, Debug)]
#[command(name = "autosort", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory to organize (overrides the configuration)
    #[arg(short, long, global = true)]
    pub base: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: SortCommand,
}

/// Represents a CLI command to execute.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCommand {
    /// Move files into category folders based on their names
    Sort {
        /// Show what would be moved without moving anything
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move every file in the category folders back into the base directory
    Restore {
        /// Show what would be moved without moving anything
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Errors that end a CLI run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Run(#[from] SortError),
    #[error("Error writing JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runs the CLI application with an optional base override and configuration file.
///
/// # Arguments
///
/// * `command` - The command to execute (Sort or Restore)
/// * `dir_path` - Base directory; falls back to the configured one
/// * `config_path` - Optional path to configuration file
///
/// Without `config_path` the configuration is looked up the usual way (see
/// [`SortConfig::load`]).
///
/// # Examples
///
/// ```no_run
/// use autosort::cli::{run_cli_with_config, SortCommand};
/// use std::path::Path;
///
/// let result = run_cli_with_config(
///     SortCommand::Sort { dry_run: true, json: false },
///     Some(Path::new("/path/to/research")),
///     None,
/// );
/// match result {
///     Ok(()) => println!("Operation completed successfully"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli_with_config(
    command: SortCommand,
    dir_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let mut config = SortConfig::load(config_path)?;
    if let Some(dir) = dir_path {
        config.base_dir = Some(dir.to_path_buf());
    }

    match command {
        SortCommand::Sort { dry_run, json } => {
            config.dry_run |= dry_run;
            sort_directory(&config, json)
        }
        SortCommand::Restore { dry_run, json } => {
            config.dry_run |= dry_run;
            restore_directory(&config, json)
        }
    }
}

/// Sorts the configured base directory and renders the report.
fn sort_directory(config: &SortConfig, json: bool) -> Result<(), CliError> {
    if !json {
        let prefix = if config.dry_run { "DRY RUN: " } else { "" };
        println!(
            "{}",
            format!("{}Sorting contents of: {}", prefix, config.base_dir().display()).cyan()
        );
    }

    let report = Sorter::new(config)?.run()?;

    if json {
        OutputFormatter::json(&report)?;
    } else {
        OutputFormatter::print_sort_report(&report);
    }
    Ok(())
}

/// Restores the category folders of the configured base and renders the report.
fn restore_directory(config: &SortConfig, json: bool) -> Result<(), CliError> {
    if !json {
        println!("{}", "Restoring files to the base directory...".cyan());
    }

    let report = Restorer::new(config).run()?;

    if json {
        OutputFormatter::json(&report)?;
    } else {
        OutputFormatter::print_restore_report(&report);
    }
    Ok(())
}
