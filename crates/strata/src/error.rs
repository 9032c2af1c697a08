//! Error types for Strata operations.
//!
//! This module provides the main error type [`StrataError`] which wraps
//! the error conditions of every pipeline stage.

use std::io;

use thiserror::Error;

use strata_parser::{Document, ParseError};

use crate::{levels::CycleDetected, tree::TreeCycle};

/// The main error type for Strata operations.
///
/// # Diagnostic Variants
///
/// The `Resolve` variant carries the documents the diagnostics point into,
/// so callers can render labeled source snippets.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Resolve { err: ParseError, sources: Vec<Document> },

    #[error(transparent)]
    Cycle(#[from] CycleDetected),

    #[error(transparent)]
    Tree(#[from] TreeCycle),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::export::Error> for StrataError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl StrataError {
    /// Create a new `Resolve` error with the documents it refers to.
    pub fn new_resolve_error(err: ParseError, sources: impl Into<Vec<Document>>) -> Self {
        Self::Resolve {
            err,
            sources: sources.into(),
        }
    }
}
