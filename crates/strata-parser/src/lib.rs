//! # Strata Parser
//!
//! Tolerant reading of schema documents. This crate turns a set of documents
//! into a [`Corpus`]: one resource per document, the raw type references of
//! each resource, and the global map from defined type to owning resource.
//!
//! ## Usage
//!
//! ```
//! # use strata_parser::{parse, Document, ParseError, ResolveConfig};
//!
//! fn main() -> Result<(), ParseError> {
//!     let documents = [
//!         Document::new(
//!             "patient.graphql",
//!             "type Patient implements IDomainResource { name: [HumanName] }",
//!         ),
//!         Document::new("humanname.graphql", "type HumanName { family: String }"),
//!     ];
//!
//!     let corpus = parse(&documents, &ResolveConfig::default())?;
//!     assert_eq!(corpus.resource_count(), 2);
//!     Ok(())
//! }
//! ```

mod corpus;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod resolve;
mod span;
pub mod tokens;

pub use corpus::{
    Corpus, Document, DocumentSummary, OwnershipMap, ResourceEntry, merge_ownership,
};
pub use error::{Diagnostic, ErrorCode, Label, ParseError, Severity};
pub use extract::{Definition, Extraction};
pub use resolve::ConflictPolicy;
pub use span::{Span, Spanned};

use strata_core::vocabulary::Vocabulary;

/// Settings for resolving and merging documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Scalar names and marker interfaces.
    pub vocabulary: Vocabulary,
    /// Tie-break for definitions claimed by several documents.
    pub conflict_policy: ConflictPolicy,
}

impl ResolveConfig {
    /// Create a new ResolveConfig with the given vocabulary and policy
    pub fn new(vocabulary: Vocabulary, conflict_policy: ConflictPolicy) -> Self {
        Self {
            vocabulary,
            conflict_policy,
        }
    }
}

/// Read a set of documents into a [`Corpus`].
///
/// The pipeline:
///
/// 1. **Tokenize** - Split each document into tokens, never failing
/// 2. **Extract** - Collect defined types and field-type references
/// 3. **Resolve** - Pick each document's resource
/// 4. **Merge** - Build the ownership map under the conflict policy
///
/// # Errors
///
/// Returns a [`ParseError`] only when the merge reports errors, which happens
/// under [`ConflictPolicy::Reject`]. Malformed text never fails.
pub fn parse(documents: &[Document], config: &ResolveConfig) -> Result<Corpus, ParseError> {
    let summaries = documents
        .iter()
        .map(|document| DocumentSummary::new(document, &config.vocabulary))
        .collect();

    merge_ownership(summaries, &config.vocabulary, config.conflict_policy)
}
