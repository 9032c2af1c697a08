//! Resource dependency graph.
//!
//! Nodes are resources and an edge `A -> B` means resource `A` depends on
//! resource `B`. The graph never holds self loops or scalar names, and edge
//! targets are always owning resources. Every resource of the corpus is a
//! node, including resources without any dependency.

use std::collections::BTreeSet;

use log::{debug, trace};
use petgraph::{Direction, graphmap::DiGraphMap};

use strata_core::{identifier::Id, vocabulary::Vocabulary};
use strata_parser::{OwnershipMap, ResourceEntry};

/// Directed resource→dependency graph.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraphMap<Id, ()>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource node. Adding an existing resource is a no-op.
    pub fn add_resource(&mut self, resource: Id) {
        self.graph.add_node(resource);
    }

    /// Records that `resource` depends on `dependency`, adding both nodes.
    ///
    /// Returns `false` without changing the graph for a self dependency.
    pub fn add_dependency(&mut self, resource: Id, dependency: Id) -> bool {
        if resource == dependency {
            return false;
        }
        self.graph.add_edge(resource, dependency, ());
        true
    }

    pub fn contains(&self, resource: Id) -> bool {
        self.graph.contains_node(resource)
    }

    pub fn resource_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All resources in lexicographic order.
    pub fn resources(&self) -> Vec<Id> {
        sorted(self.graph.nodes())
    }

    /// What `resource` depends on, in lexicographic order.
    pub fn dependencies(&self, resource: Id) -> Vec<Id> {
        self.neighbors(resource, Direction::Outgoing)
    }

    /// Resources that depend on `resource`, in lexicographic order.
    pub fn dependents(&self, resource: Id) -> Vec<Id> {
        self.neighbors(resource, Direction::Incoming)
    }

    /// Returns `true` if `resource` depends directly on `dependency`.
    pub fn depends_on(&self, resource: Id, dependency: Id) -> bool {
        self.graph.contains_edge(resource, dependency)
    }

    /// Resources no other resource depends on, in lexicographic order.
    pub fn roots(&self) -> Vec<Id> {
        sorted(self.graph.nodes().filter(|&node| {
            self.graph
                .neighbors_directed(node, Direction::Incoming)
                .next()
                .is_none()
        }))
    }

    fn neighbors(&self, resource: Id, direction: Direction) -> Vec<Id> {
        if !self.graph.contains_node(resource) {
            return Vec::new();
        }
        sorted(self.graph.neighbors_directed(resource, direction))
    }
}

fn sorted(ids: impl Iterator<Item = Id>) -> Vec<Id> {
    let mut ids: Vec<Id> = ids.collect();
    ids.sort();
    ids
}

/// Build the dependency graph of a set of resources.
///
/// For each resource `R` and raw reference `D` of its document, `D` is
/// skipped when it is a scalar, when it is `R` itself, when its owner is
/// `R`, or when no document defines it. Otherwise the edge `R -> owner(D)`
/// is added.
///
/// # Arguments
///
/// * `ownership` - Global type→resource map.
/// * `resources` - Resource entries with their raw references.
/// * `vocabulary` - Provides the scalar names to filter.
pub fn build_graph<'a>(
    ownership: &OwnershipMap,
    resources: impl IntoIterator<Item = &'a ResourceEntry>,
    vocabulary: &Vocabulary,
) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let mut unresolved: BTreeSet<Id> = BTreeSet::new();

    for entry in resources {
        let resource = entry.resource();
        graph.add_resource(resource);

        for &reference in entry.references() {
            if vocabulary.is_scalar(reference) || reference == resource {
                continue;
            }
            let Some(owner) = ownership.owner(reference) else {
                trace!(resource:% = resource, reference:% = reference; "Unresolved reference dropped");
                unresolved.insert(reference);
                continue;
            };
            if owner == resource {
                continue;
            }
            graph.add_dependency(resource, owner);
        }
    }

    debug!(
        resources = graph.resource_count(),
        dependencies = graph.dependency_count(),
        unresolved = unresolved.len();
        "Dependency graph built"
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    use strata_parser::{Corpus, Document, ResolveConfig, parse};

    fn corpus(documents: &[(&str, &str)]) -> Corpus {
        let documents: Vec<Document> = documents
            .iter()
            .map(|(name, text)| Document::new(*name, *text))
            .collect();
        parse(&documents, &ResolveConfig::default()).unwrap()
    }

    fn graph_of(documents: &[(&str, &str)]) -> DependencyGraph {
        let corpus = corpus(documents);
        build_graph(corpus.ownership(), corpus.resources(), &Vocabulary::default())
    }

    fn names(ids: Vec<Id>) -> Vec<String> {
        ids.into_iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_scalars_are_not_dependencies() {
        let graph = graph_of(&[
            ("a.graphql", "type A { b: B name: String }"),
            ("b.graphql", "type B { id: ID }"),
        ]);

        assert_eq!(names(graph.resources()), vec!["A", "B"]);
        assert_eq!(names(graph.dependencies(Id::new("A"))), vec!["B"]);
        assert!(graph.dependencies(Id::new("B")).is_empty());
        assert!(!graph.contains(Id::new("String")));
    }

    #[test]
    fn test_inline_types_collapse_into_owner() {
        let graph = graph_of(&[(
            "patient.graphql",
            "type Patient implements IDomainResource { contact: [Patient_Contact] }\n\
             type Patient_Contact { name: String }",
        )]);

        assert_eq!(graph.resource_count(), 1);
        assert_eq!(graph.dependency_count(), 0);
    }

    #[test]
    fn test_self_reference_is_not_an_edge() {
        let graph = graph_of(&[(
            "extension.graphql",
            "type Extension { extension: [Extension] }",
        )]);

        assert!(!graph.depends_on(Id::new("Extension"), Id::new("Extension")));
        assert_eq!(graph.dependency_count(), 0);
    }

    #[test]
    fn test_edges_target_owning_resource() {
        let graph = graph_of(&[
            ("observation.graphql", "type Observation implements IDomainResource { component: [Patient_Contact] }"),
            (
                "patient.graphql",
                "type Patient implements IDomainResource { contact: [Patient_Contact] }\n\
                 type Patient_Contact { name: String }",
            ),
        ]);

        assert!(graph.depends_on(Id::new("Observation"), Id::new("Patient")));
        assert!(!graph.contains(Id::new("Patient_Contact")));
    }

    #[test]
    fn test_unresolved_references_dropped() {
        let graph = graph_of(&[("a.graphql", "type A { x: Unknown }")]);

        assert_eq!(names(graph.resources()), vec!["A"]);
        assert_eq!(graph.dependency_count(), 0);
    }

    #[test]
    fn test_custom_scalars() {
        let corpus = corpus(&[
            ("a.graphql", "type A { b: B }"),
            ("b.graphql", "type B { id: ID }"),
        ]);
        let vocabulary = Vocabulary::new(["B"], Vec::<&str>::new()).unwrap();
        let graph = build_graph(corpus.ownership(), corpus.resources(), &vocabulary);

        assert_eq!(graph.dependency_count(), 0);
        assert_eq!(graph.resource_count(), 2);
    }

    #[test]
    fn test_roots_and_dependents() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(Id::new("C"), Id::new("A"));
        graph.add_dependency(Id::new("B"), Id::new("A"));
        graph.add_resource(Id::new("D"));

        assert_eq!(names(graph.roots()), vec!["B", "C", "D"]);
        assert_eq!(names(graph.dependents(Id::new("A"))), vec!["B", "C"]);
        assert!(graph.dependents(Id::new("Missing")).is_empty());
    }

    #[test]
    fn test_add_dependency_rejects_self_loop() {
        let mut graph = DependencyGraph::new();
        assert!(!graph.add_dependency(Id::new("A"), Id::new("A")));
        assert_eq!(graph.resource_count(), 0);
    }
}
