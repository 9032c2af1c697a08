//! Command-line argument definitions for the Strata CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input directory, output paths,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Strata dependency leveling tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the schema documents
    #[arg(help = "Directory containing the schema documents")]
    pub input: String,

    /// Path to the leveled CSV output
    #[arg(long, default_value = "dependency_tree.csv")]
    pub csv: String,

    /// Path to the JSON tree output
    #[arg(long, default_value = "dependency_tree.json")]
    pub json: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Document file extension, overriding the configuration
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
