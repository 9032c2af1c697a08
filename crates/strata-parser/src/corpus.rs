//! Merging per-document results into one corpus.
//!
//! Every document contributes one resource and a set of defined types. The
//! merge builds the global type→resource ownership map. Documents are
//! visited in ascending name order, then text order for documents sharing a
//! name, so ties between documents are settled by the [`ConflictPolicy`] and
//! never by the order documents were supplied in.

use std::collections::{BTreeSet, HashMap, hash_map::Entry};

use indexmap::IndexMap;
use log::{debug, info};

use strata_core::{identifier::Id, vocabulary::Vocabulary};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    extract::{self, Extraction},
    resolve::{self, ConflictPolicy, Resolution},
    span::Span,
};

/// A named schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// File name, e.g. `patient.graphql`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Extraction and resolution results for one document.
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    document: String,
    text: String,
    resolution: Resolution,
    extraction: Extraction,
}

impl DocumentSummary {
    /// Extract and resolve a single document.
    pub fn new(document: &Document, vocabulary: &Vocabulary) -> Self {
        let extraction = extract::extract(document.text());
        let resolution = resolve::resolve(&extraction, document.name(), vocabulary);
        Self {
            document: document.name().to_string(),
            text: document.text().to_string(),
            resolution,
            extraction,
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn resource(&self) -> Id {
        self.resolution.resource()
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }
}

/// Global map from defined type name to the resource that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipMap {
    owners: HashMap<Id, Id>,
}

impl OwnershipMap {
    /// Owning resource of `type_name`, if any document defines it.
    pub fn owner(&self, type_name: Id) -> Option<Id> {
        self.owners.get(&type_name).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Entries sorted by type name.
    pub fn iter(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        let mut entries: Vec<_> = self.owners.iter().map(|(&ty, &owner)| (ty, owner)).collect();
        entries.sort();
        entries.into_iter()
    }
}

impl FromIterator<(Id, Id)> for OwnershipMap {
    fn from_iter<T: IntoIterator<Item = (Id, Id)>>(iter: T) -> Self {
        Self {
            owners: iter.into_iter().collect(),
        }
    }
}

/// A resource and the raw references of the document that provides it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    resource: Id,
    document: String,
    references: BTreeSet<Id>,
}

impl ResourceEntry {
    pub fn resource(&self) -> Id {
        self.resource
    }

    /// Name of the document whose references are used.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn references(&self) -> &BTreeSet<Id> {
        &self.references
    }
}

/// The merged view of all documents.
#[derive(Debug, Clone)]
pub struct Corpus {
    resources: IndexMap<Id, ResourceEntry>,
    ownership: OwnershipMap,
    warnings: Vec<Diagnostic>,
}

impl Corpus {
    /// Resources in the order their first document appears.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.resources.values()
    }

    pub fn resource(&self, resource: Id) -> Option<&ResourceEntry> {
        self.resources.get(&resource)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn ownership(&self) -> &OwnershipMap {
        &self.ownership
    }

    /// Warnings recorded while merging, e.g. overridden definitions.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// A type definition claimed by a document.
struct Claim {
    resource: Id,
    summary: usize,
    span: Span,
}

/// Merge per-document summaries into a [`Corpus`].
///
/// # Errors
///
/// Under [`ConflictPolicy::Reject`], returns every duplicate type definition
/// (`E100`) and duplicate resource (`E101`) at once. The other policies only
/// produce warnings, which end up in [`Corpus::warnings`].
pub fn merge_ownership(
    mut summaries: Vec<DocumentSummary>,
    vocabulary: &Vocabulary,
    policy: ConflictPolicy,
) -> Result<Corpus, ParseError> {
    summaries.sort_by(|a, b| (&a.document, &a.text).cmp(&(&b.document, &b.text)));

    let mut collector = DiagnosticCollector::new();
    let winners = merge_resources(&summaries, policy, &mut collector);
    let claims = merge_definitions(&summaries, vocabulary, policy, &mut collector);

    let warnings = collector.finish()?;

    let resources: IndexMap<Id, ResourceEntry> = winners
        .into_iter()
        .map(|(resource, idx)| {
            let summary = &summaries[idx];
            let entry = ResourceEntry {
                resource,
                document: summary.document.clone(),
                references: summary.extraction.references().clone(),
            };
            (resource, entry)
        })
        .collect();

    let ownership: OwnershipMap = claims
        .into_iter()
        .map(|(ty, claim)| (ty, claim.resource))
        .collect();

    info!(
        documents = summaries.len(),
        resources = resources.len(),
        types = ownership.len(),
        warnings = warnings.len(),
        policy:% = policy;
        "Ownership merged"
    );

    Ok(Corpus {
        resources,
        ownership,
        warnings,
    })
}

/// Picks the providing document of every resource.
fn merge_resources(
    summaries: &[DocumentSummary],
    policy: ConflictPolicy,
    collector: &mut DiagnosticCollector,
) -> IndexMap<Id, usize> {
    let mut winners: IndexMap<Id, usize> = IndexMap::new();

    for (idx, summary) in summaries.iter().enumerate() {
        let resource = summary.resource();
        let Some(&previous) = winners.get(&resource) else {
            winners.insert(resource, idx);
            continue;
        };
        let previous_doc = &summaries[previous].document;

        match policy {
            ConflictPolicy::Reject => {
                let diagnostic = Diagnostic::error(format!(
                    "resource `{resource}` is provided by more than one document"
                ))
                .with_code(ErrorCode::E101)
                .with_help(format!("`{previous_doc}` also resolves to `{resource}`"));
                collector.emit(resource_site(diagnostic, summary, "duplicate resource"));
            }
            ConflictPolicy::FirstDocument => {
                let diagnostic = Diagnostic::warning(format!(
                    "resource `{resource}` is provided by more than one document"
                ))
                .with_code(ErrorCode::E101)
                .with_help(format!(
                    "references of `{resource}` are taken from `{previous_doc}` ({policy})"
                ));
                collector.emit(resource_site(diagnostic, summary, "document ignored"));
            }
            ConflictPolicy::LastDocument => {
                let diagnostic = Diagnostic::warning(format!(
                    "resource `{resource}` is provided by more than one document"
                ))
                .with_code(ErrorCode::E101)
                .with_help(format!(
                    "references of `{resource}` are taken from `{}` ({policy})",
                    summary.document
                ));
                collector.emit(resource_site(
                    diagnostic,
                    &summaries[previous],
                    "document overridden",
                ));
                winners.insert(resource, idx);
            }
        }
    }

    winners
}

/// Attaches a summary's document and resource span to a diagnostic.
fn resource_site(diagnostic: Diagnostic, summary: &DocumentSummary, label: &str) -> Diagnostic {
    let diagnostic = diagnostic.in_document(summary.document.clone());
    match summary.resolution.span() {
        Some(span) => diagnostic.with_label(span, label),
        None => diagnostic,
    }
}

/// Builds the type ownership claims.
fn merge_definitions(
    summaries: &[DocumentSummary],
    vocabulary: &Vocabulary,
    policy: ConflictPolicy,
    collector: &mut DiagnosticCollector,
) -> HashMap<Id, Claim> {
    let mut claims: HashMap<Id, Claim> = HashMap::new();

    for (idx, summary) in summaries.iter().enumerate() {
        for def in unique_definitions(&summary.extraction) {
            let name = def.0;
            let claim = Claim {
                resource: summary.resource(),
                summary: idx,
                span: def.1,
            };

            if vocabulary.is_scalar(name) {
                collector.emit(
                    Diagnostic::warning(format!("type `{name}` redefines a scalar"))
                        .with_code(ErrorCode::E102)
                        .in_document(summary.document.clone())
                        .with_label(claim.span, "scalar redefined")
                        .with_help(format!("references to `{name}` are still treated as scalar")),
                );
            }

            let mut existing = match claims.entry(name) {
                Entry::Vacant(vacant) => {
                    vacant.insert(claim);
                    continue;
                }
                Entry::Occupied(occupied) => occupied,
            };

            // Two documents of one resource may share helper types
            if existing.get().resource == claim.resource {
                continue;
            }

            let previous = existing.get();
            let previous_doc = &summaries[previous.summary].document;
            let message = format!("type `{name}` is defined in more than one document");

            match policy {
                ConflictPolicy::Reject => {
                    collector.emit(
                        Diagnostic::error(message)
                            .with_code(ErrorCode::E100)
                            .in_document(summary.document.clone())
                            .with_label(claim.span, "duplicate definition")
                            .with_help(format!(
                                "`{previous_doc}` also defines `{name}` for resource `{}`",
                                previous.resource
                            )),
                    );
                }
                ConflictPolicy::FirstDocument => {
                    collector.emit(
                        Diagnostic::warning(message)
                            .with_code(ErrorCode::E100)
                            .in_document(summary.document.clone())
                            .with_label(claim.span, "definition ignored")
                            .with_help(format!(
                                "`{previous_doc}` owns `{name}` for resource `{}` ({policy})",
                                previous.resource
                            )),
                    );
                }
                ConflictPolicy::LastDocument => {
                    collector.emit(
                        Diagnostic::warning(message)
                            .with_code(ErrorCode::E100)
                            .in_document(previous_doc.clone())
                            .with_label(previous.span, "definition overridden")
                            .with_help(format!(
                                "`{}` owns `{name}` for resource `{}` ({policy})",
                                summary.document, claim.resource
                            )),
                    );
                    debug!(
                        type_name:% = name,
                        from:% = previous.resource,
                        to:% = claim.resource;
                        "Ownership overridden"
                    );
                    existing.insert(claim);
                }
            }
        }
    }

    claims
}

/// First definition site of every defined name, in source order.
fn unique_definitions(extraction: &Extraction) -> Vec<(Id, Span)> {
    extraction
        .defined_types()
        .into_iter()
        .filter_map(|name| extraction.definition(name).map(|def| (name, def.span())))
        .collect()
}
