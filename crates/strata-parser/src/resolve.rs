//! Resource resolution: choosing the one resource a document stands for.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use strata_core::{identifier::Id, vocabulary::Vocabulary};

use crate::{
    extract::{DefinitionKind, Extraction},
    span::Span,
};

/// Which definition wins when documents disagree about ownership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Conflicts are errors.
    Reject,
    /// The alphabetically first document wins.
    FirstDocument,
    /// The alphabetically last document wins.
    #[default]
    LastDocument,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictPolicy::Reject => "reject",
            ConflictPolicy::FirstDocument => "first document wins",
            ConflictPolicy::LastDocument => "last document wins",
        };
        write!(f, "{name}")
    }
}

/// How a document's resource was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOrigin {
    /// First `type` implementing this marker interface.
    Marker(Id),
    /// First `type` declaration in the document.
    FirstType,
    /// Derived from the document name.
    DocumentName,
}

/// The resolved resource of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    resource: Id,
    origin: ResourceOrigin,
    span: Option<Span>,
}

impl Resolution {
    pub fn resource(&self) -> Id {
        self.resource
    }

    pub fn origin(&self) -> ResourceOrigin {
        self.origin
    }

    /// Span of the chosen declaration. `None` for name-derived resources.
    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

/// Resolve the resource of a document from its text.
///
/// Priority: for each marker in vocabulary order, the first `type` whose
/// implements clause names it; else the first `type`; else the document
/// name up to its first `.`, first letter capitalized.
///
/// # Examples
///
/// ```
/// use strata_core::vocabulary::Vocabulary;
/// use strata_parser::resolve::resolve_resource;
///
/// let vocabulary = Vocabulary::default();
/// let text = "type Helper { a: A }\ntype Patient implements IDomainResource { h: Helper }";
///
/// assert_eq!(resolve_resource(text, "patient.graphql", &vocabulary), "Patient");
/// assert_eq!(resolve_resource("", "observation.graphql", &vocabulary), "Observation");
/// ```
pub fn resolve_resource(text: &str, document_name: &str, vocabulary: &Vocabulary) -> Id {
    resolve(&crate::extract::extract(text), document_name, vocabulary).resource()
}

/// Resolve from an existing extraction.
pub fn resolve(extraction: &Extraction, document_name: &str, vocabulary: &Vocabulary) -> Resolution {
    let types = || {
        extraction
            .definitions()
            .iter()
            .filter(|def| def.kind() == DefinitionKind::Type)
    };

    let resolution = vocabulary
        .markers()
        .iter()
        .find_map(|&marker| {
            types()
                .find(|def| def.implements_interface(marker))
                .map(|def| Resolution {
                    resource: def.name(),
                    origin: ResourceOrigin::Marker(marker),
                    span: Some(def.span()),
                })
        })
        .or_else(|| {
            types().next().map(|def| Resolution {
                resource: def.name(),
                origin: ResourceOrigin::FirstType,
                span: Some(def.span()),
            })
        })
        .unwrap_or_else(|| Resolution {
            resource: Id::new(&name_from_document(document_name)),
            origin: ResourceOrigin::DocumentName,
            span: None,
        });

    debug!(
        document = document_name,
        resource:% = resolution.resource,
        origin:? = resolution.origin;
        "Resource resolved"
    );

    resolution
}

/// `observation.profile.graphql` becomes `Observation`.
fn name_from_document(document_name: &str) -> String {
    let stem = document_name.split('.').next().unwrap_or_default();
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
