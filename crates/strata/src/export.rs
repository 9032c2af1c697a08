//! Export of analysis results.
//!
//! This module provides the [`Exporter`] trait that turns a [`LevelTable`]
//! or a forest of [`TreeNode`]s into text. It is the final stage of the
//! pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Documents
//!     ↓ parse
//! Corpus (resources + ownership)
//!     ↓ graph
//! Dependency Graph
//!     ↓ level / tree
//! LevelTable, Vec<TreeNode>
//!     ↓ export (this module)
//! CSV / JSON text
//! ```
//!
//! # Available Backends
//!
//! - [`csv`] - Leveled table via [`csv::CsvExporter`]
//! - [`json`] - Nested trees via [`json::JsonExporter`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. [`Error`] converts into
//! [`StrataError::Export`] at the crate boundary.
//!
//! [`StrataError::Export`]: crate::StrataError::Export

/// CSV export backend.
pub mod csv;
/// JSON export backend.
pub mod json;

use crate::{levels::LevelTable, tree::TreeNode};

/// Abstraction for export backends.
///
/// Backends implement the outputs they support; the defaults report
/// [`Error::Unsupported`].
pub trait Exporter {
    /// Short format name used in error messages, e.g. `"csv"`.
    fn format(&self) -> &'static str;

    /// Exports a level table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the backend has no table output.
    fn export_levels(&self, levels: &LevelTable) -> Result<String, Error> {
        let _ = levels;
        Err(Error::Unsupported {
            format: self.format(),
            output: "level tables",
        })
    }

    /// Exports dependency trees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the backend has no tree output.
    fn export_trees(&self, trees: &[TreeNode]) -> Result<String, Error> {
        let _ = trees;
        Err(Error::Unsupported {
            format: self.format(),
            output: "dependency trees",
        })
    }
}

/// Errors that can occur during export.
///
/// This type is converted into [`StrataError::Export`] via the [`From`]
/// implementation in [`crate::error`].
///
/// [`StrataError::Export`]: crate::StrataError::Export
#[derive(Debug)]
pub enum Error {
    /// The backend cannot produce this kind of output.
    Unsupported {
        format: &'static str,
        output: &'static str,
    },
    /// Serialization failed.
    Serialize(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported { format, output } => {
                write!(f, "{format} export does not support {output}")
            }
            Self::Serialize(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unsupported { .. } => None,
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}
