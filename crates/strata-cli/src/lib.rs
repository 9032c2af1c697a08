//! CLI logic for the Strata dependency leveling tool.
//!
//! This module contains the core CLI logic: discovering documents, running
//! the analysis, and writing the CSV and JSON outputs.

pub mod error_adapter;

mod args;
mod config;
mod discover;

pub use args::Args;
pub use discover::discover_documents;

use std::{fs, path::Path};

use log::{info, warn};

use strata::{Analyzer, StrataError, config::DiscoveryConfig};

use error_adapter::{render, warning_reportables};

/// Run the Strata CLI application
///
/// Reads every document of the input directory, levels the resource
/// dependency graph, and writes the CSV table and the JSON trees. When the
/// graph has a cycle, the partial CSV is still written, the JSON is skipped,
/// and the cycle is returned as the error.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StrataError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Ownership conflicts rejected by the conflict policy
/// - Dependency cycles
pub fn run(args: &Args) -> Result<(), StrataError> {
    info!(
        input_dir = args.input,
        csv_path = args.csv,
        json_path = args.json;
        "Processing documents"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(extension) = &args.extension {
        app_config = app_config.with_discovery(DiscoveryConfig::new(extension.as_str()));
    }

    let documents = discover_documents(Path::new(&args.input), app_config.discovery().extension())?;
    if documents.is_empty() {
        warn!(input_dir = args.input; "No documents found");
    }

    let analyzer = Analyzer::new(app_config);
    let corpus = analyzer.parse(&documents)?;

    for reportable in warning_reportables(corpus.warnings(), &documents) {
        warn!("{}", render(&reportable));
    }

    let analysis = match analyzer.analyze_corpus(corpus) {
        Ok(analysis) => analysis,
        Err(StrataError::Cycle(cycle)) => {
            fs::write(&args.csv, analyzer.render_csv(cycle.resolved())?)?;
            warn!(
                csv_path = args.csv,
                leveled = cycle.resolved().len();
                "Partial level table written, JSON skipped"
            );
            return Err(StrataError::Cycle(cycle));
        }
        Err(err) => return Err(err),
    };

    fs::write(&args.csv, analyzer.render_csv(analysis.levels())?)?;
    info!(output_file = args.csv, rows = analysis.levels().len(); "CSV exported successfully");

    fs::write(&args.json, analyzer.render_json(analysis.trees())?)?;
    info!(output_file = args.json, roots = analysis.trees().len(); "JSON exported successfully");

    Ok(())
}
