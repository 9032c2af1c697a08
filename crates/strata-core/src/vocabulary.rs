//! Schema vocabulary: the names that steer extraction and graph building.
//!
//! A [`Vocabulary`] holds two pieces of static configuration:
//!
//! - the **scalar set**, leaf type names (`String`, `dateTime`, ...) that
//!   never become graph nodes or edge targets;
//! - the **marker interfaces**, an ordered list of interface names
//!   (`IDomainResource`, `IResource`) that identify a document's primary
//!   type. Earlier markers take priority over later ones.
//!
//! The vocabulary is an explicit value handed to the extractor, resolver and
//! graph builder rather than global state.
//!
//! # Example
//!
//! ```
//! # use strata_core::{identifier::Id, vocabulary::Vocabulary};
//! let vocabulary = Vocabulary::default();
//! assert!(vocabulary.is_scalar(Id::new("String")));
//! assert_eq!(vocabulary.markers()[0], "IDomainResource");
//! ```

use std::collections::BTreeSet;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::identifier::Id;

/// Scalar names of the FHIR GraphQL schema.
pub const DEFAULT_SCALARS: &[&str] = &[
    "ID",
    "String",
    "Boolean",
    "uri",
    "code",
    "markdown",
    "instant",
    "positiveInt",
    "dateTime",
    "Int",
    "Float",
    "date",
    "base64Binary",
    "canonical",
    "oid",
    "time",
    "unsignedInt",
    "url",
    "uuid",
    "xhtml",
    "decimal",
];

/// Marker interfaces of the FHIR GraphQL schema, in priority order.
pub const DEFAULT_MARKERS: &[&str] = &["IDomainResource", "IResource"];

/// Errors raised while building a [`Vocabulary`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("invalid {kind} name `{name}`: names must be non-empty identifiers")]
    InvalidName { kind: &'static str, name: String },

    #[error("marker interface `{0}` is listed more than once")]
    DuplicateMarker(String),

    #[error("`{0}` is listed both as a scalar and as a marker interface")]
    ScalarMarker(String),
}

/// Scalar type names and marker interfaces used across the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawVocabulary")]
pub struct Vocabulary {
    scalars: BTreeSet<Id>,
    markers: Vec<Id>,
}

impl Vocabulary {
    /// Creates a validated vocabulary.
    ///
    /// # Arguments
    ///
    /// * `scalars` - Leaf type names to ignore during graph building.
    /// * `markers` - Marker interface names, highest priority first.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError`] when a name is not an identifier, a marker
    /// repeats, or a name is both scalar and marker.
    pub fn new<S, M>(scalars: S, markers: M) -> Result<Self, VocabularyError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        let mut scalar_set = BTreeSet::new();
        for name in scalars {
            scalar_set.insert(checked_name("scalar", name.as_ref())?);
        }

        let mut marker_list: Vec<Id> = Vec::new();
        for name in markers {
            let id = checked_name("marker", name.as_ref())?;
            if marker_list.contains(&id) {
                return Err(VocabularyError::DuplicateMarker(id.to_string()));
            }
            if scalar_set.contains(&id) {
                return Err(VocabularyError::ScalarMarker(id.to_string()));
            }
            marker_list.push(id);
        }

        debug!(
            scalars = scalar_set.len(),
            markers = marker_list.len();
            "Vocabulary created"
        );

        Ok(Self {
            scalars: scalar_set,
            markers: marker_list,
        })
    }

    /// Returns `true` if `name` is a scalar type.
    pub fn is_scalar(&self, name: Id) -> bool {
        self.scalars.contains(&name)
    }

    /// Returns the scalar names in lexicographic order.
    pub fn scalars(&self) -> impl Iterator<Item = Id> + '_ {
        self.scalars.iter().copied()
    }

    /// Returns the marker interfaces in priority order.
    pub fn markers(&self) -> &[Id] {
        &self.markers
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SCALARS, DEFAULT_MARKERS)
            .expect("Default vocabulary is valid")
    }
}

/// Unvalidated vocabulary as it appears in configuration files.
#[derive(Debug, Deserialize)]
struct RawVocabulary {
    #[serde(default = "default_scalars")]
    scalars: Vec<String>,
    #[serde(default = "default_markers")]
    markers: Vec<String>,
}

impl TryFrom<RawVocabulary> for Vocabulary {
    type Error = VocabularyError;

    fn try_from(raw: RawVocabulary) -> Result<Self, Self::Error> {
        Self::new(raw.scalars, raw.markers)
    }
}

fn default_scalars() -> Vec<String> {
    DEFAULT_SCALARS.iter().map(|s| s.to_string()).collect()
}

fn default_markers() -> Vec<String> {
    DEFAULT_MARKERS.iter().map(|s| s.to_string()).collect()
}

fn checked_name(kind: &'static str, name: &str) -> Result<Id, VocabularyError> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(VocabularyError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(Id::new(name))
}
