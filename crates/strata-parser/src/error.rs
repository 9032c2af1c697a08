//! Error and diagnostic system for the Strata parser.
//!
//! Extraction itself never fails; diagnostics come from merging the
//! per-document results into one corpus, where two documents can claim the
//! same type or the same resource name.
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional error code, the document it
//! points into, labeled source spans, and help text. Error diagnostics are
//! wrapped in [`ParseError`] when the corpus is rejected.
//!
//! # Example
//!
//! ```
//! # use strata_parser::error::{Diagnostic, ErrorCode};
//! # use strata_parser::Span;
//!
//! let diag = Diagnostic::error("type `HumanName` is defined in more than one document")
//!     .with_code(ErrorCode::E100)
//!     .in_document("humanname.graphql")
//!     .with_label(Span::new(5..14), "defined again here")
//!     .with_help("first defined in `datatypes.graphql`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
