//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Interactive session arguments.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Don't print a prompt before each command
    #[arg(long)]
    pub no_prompt: bool,
}

/// Script run arguments.
#[derive(Debug, Args)]
pub struct RunCommand {
    /// File with one session command per line
    #[arg(value_name = "FILE")]
    pub script: PathBuf,

    /// Print the final roster as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
