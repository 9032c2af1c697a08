//! Configuration types for Strata analysis.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`Vocabulary`] - Scalar names and marker interfaces (`[vocabulary]`).
//! - [`ResolveSection`] - Ownership conflict handling (`[resolve]`).
//! - [`DiscoveryConfig`] - Which files count as documents (`[discovery]`).
//!
//! # Example
//!
//! ```
//! # use strata::config::AppConfig;
//! # use strata::ConflictPolicy;
//! let config = AppConfig::default();
//! assert_eq!(config.resolve().conflict_policy(), ConflictPolicy::LastDocument);
//! assert_eq!(config.discovery().extension(), "graphql");
//! ```

use serde::Deserialize;

use strata_core::vocabulary::Vocabulary;
use strata_parser::{ConflictPolicy, ResolveConfig};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Vocabulary section.
    #[serde(default)]
    vocabulary: Vocabulary,

    /// Resolve section.
    #[serde(default)]
    resolve: ResolveSection,

    /// Discovery section.
    #[serde(default)]
    discovery: DiscoveryConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(vocabulary: Vocabulary, resolve: ResolveSection, discovery: DiscoveryConfig) -> Self {
        Self {
            vocabulary,
            resolve,
            discovery,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn resolve(&self) -> &ResolveSection {
        &self.resolve
    }

    pub fn discovery(&self) -> &DiscoveryConfig {
        &self.discovery
    }

    /// Returns a copy with `policy` as the conflict policy.
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.resolve.conflict_policy = policy;
        self
    }

    /// Returns a copy with `discovery` as the discovery section.
    pub fn with_discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = discovery;
        self
    }

    /// Settings handed to the parser.
    pub(crate) fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig::new(self.vocabulary.clone(), self.resolve.conflict_policy)
    }
}

/// How duplicate definitions across documents are settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ResolveSection {
    #[serde(default)]
    conflict_policy: ConflictPolicy,
}

impl ResolveSection {
    pub fn new(conflict_policy: ConflictPolicy) -> Self {
        Self { conflict_policy }
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict_policy
    }
}

/// Which files in an input directory are documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscoveryConfig {
    /// File extension without the leading dot.
    #[serde(default = "default_extension")]
    extension: String,
}

impl DiscoveryConfig {
    /// Creates a discovery config; a leading `.` is stripped.
    pub fn new(extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

fn default_extension() -> String {
    "graphql".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.vocabulary(), &Vocabulary::default());
        assert_eq!(config.resolve().conflict_policy(), ConflictPolicy::LastDocument);
        assert_eq!(config.discovery().extension(), "graphql");
    }

    #[test]
    fn test_discovery_strips_dot() {
        assert_eq!(DiscoveryConfig::new(".gql").extension(), "gql");
        assert_eq!(DiscoveryConfig::new("graphqls").extension(), "graphqls");
    }

    #[test]
    fn test_with_conflict_policy() {
        let config = AppConfig::default().with_conflict_policy(ConflictPolicy::Reject);
        assert_eq!(config.resolve().conflict_policy(), ConflictPolicy::Reject);
        assert_eq!(config.resolve_config().conflict_policy, ConflictPolicy::Reject);
    }
}
