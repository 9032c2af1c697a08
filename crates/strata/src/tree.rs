//! Nested dependency trees rooted at resources nobody depends on.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use strata_core::identifier::Id;

use crate::graph::DependencyGraph;

/// A resource with its dependencies expanded recursively.
///
/// Serializes as `{"name": ..., "children": [...]}` with `children`
/// omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    name: Id,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: Id, children: Vec<TreeNode>) -> Self {
        Self { name, children }
    }

    /// A node without children.
    pub fn leaf(name: Id) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Total number of nodes in this subtree, shared subtrees counted
    /// every time they appear.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Length of the longest path from this node to a leaf.
    pub fn depth(&self) -> usize {
        self.children.iter().map(TreeNode::depth).max().map_or(0, |d| d + 1)
    }
}

/// Expansion re-entered a resource already on the current path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle while building trees: {}", render_path(.path))]
pub struct TreeCycle {
    path: Vec<Id>,
}

impl TreeCycle {
    /// The offending path, starting and ending at the repeated resource.
    pub fn path(&self) -> &[Id] {
        &self.path
    }
}

fn render_path(path: &[Id]) -> String {
    path.iter().map(Id::to_string).collect::<Vec<_>>().join(" -> ")
}

/// Build one tree per root resource, in lexicographic root order.
///
/// Children are the sorted dependencies of a resource, expanded
/// recursively. Subtrees are memoized by resource but still appear once per
/// occurrence in the output. A strongly connected component that no root
/// reaches produces no tree.
///
/// # Errors
///
/// Returns [`TreeCycle`] as soon as expansion reaches a resource already on
/// the current path.
pub fn build_trees(graph: &DependencyGraph) -> Result<Vec<TreeNode>, TreeCycle> {
    let mut builder = TreeBuilder {
        graph,
        memo: HashMap::new(),
        path: Vec::new(),
        on_path: HashSet::new(),
    };

    let trees = graph
        .roots()
        .into_iter()
        .map(|root| builder.expand(root))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        roots = trees.len(),
        memoized = builder.memo.len();
        "Dependency trees built"
    );

    Ok(trees)
}

struct TreeBuilder<'g> {
    graph: &'g DependencyGraph,
    memo: HashMap<Id, TreeNode>,
    path: Vec<Id>,
    on_path: HashSet<Id>,
}

impl TreeBuilder<'_> {
    fn expand(&mut self, resource: Id) -> Result<TreeNode, TreeCycle> {
        if self.on_path.contains(&resource) {
            let start = self
                .path
                .iter()
                .position(|&id| id == resource)
                .unwrap_or_default();
            let mut path = self.path[start..].to_vec();
            path.push(resource);
            return Err(TreeCycle { path });
        }

        if let Some(node) = self.memo.get(&resource) {
            return Ok(node.clone());
        }

        self.path.push(resource);
        self.on_path.insert(resource);

        let children = self
            .graph
            .dependencies(resource)
            .into_iter()
            .map(|dependency| self.expand(dependency))
            .collect::<Result<Vec<_>, _>>();

        self.path.pop();
        self.on_path.remove(&resource);

        let node = TreeNode::new(resource, children?);
        self.memo.insert(resource, node.clone());
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (from, to) in edges {
            graph.add_dependency(Id::new(from), Id::new(to));
        }
        graph
    }

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    #[test]
    fn test_single_edge() {
        let trees = build_trees(&graph(&[("A", "B")])).unwrap();
        assert_eq!(trees, vec![TreeNode::new(id("A"), vec![TreeNode::leaf(id("B"))])]);
    }

    #[test]
    fn test_shared_subtrees_are_duplicated() {
        let trees = build_trees(&graph(&[
            ("A", "Shared"),
            ("B", "Shared"),
            ("Shared", "Leaf"),
        ]))
        .unwrap();

        let shared = TreeNode::new(id("Shared"), vec![TreeNode::leaf(id("Leaf"))]);
        assert_eq!(
            trees,
            vec![
                TreeNode::new(id("A"), vec![shared.clone()]),
                TreeNode::new(id("B"), vec![shared]),
            ]
        );
    }

    #[test]
    fn test_children_sorted() {
        let trees = build_trees(&graph(&[("Root", "Zed"), ("Root", "Alpha"), ("Root", "Mid")])).unwrap();
        let children: Vec<Id> = trees[0].children().iter().map(TreeNode::name).collect();
        assert_eq!(children, vec![id("Alpha"), id("Mid"), id("Zed")]);
    }

    #[test]
    fn test_isolated_resource_is_its_own_root() {
        let mut graph = graph(&[("A", "B")]);
        graph.add_resource(id("Solo"));

        let trees = build_trees(&graph).unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[1], TreeNode::leaf(id("Solo")));
    }

    #[test]
    fn test_cycle_reached_from_root_fails_fast() {
        let err = build_trees(&graph(&[("Root", "A"), ("A", "B"), ("B", "A")])).unwrap_err();
        assert_eq!(err.path(), &[id("A"), id("B"), id("A")]);
        assert_eq!(
            err.to_string(),
            "dependency cycle while building trees: A -> B -> A"
        );
    }

    #[test]
    fn test_rootless_cycle_produces_no_tree() {
        let mut graph = graph(&[("A", "B"), ("B", "A")]);
        graph.add_resource(id("Other"));

        let trees = build_trees(&graph).unwrap();
        assert_eq!(trees, vec![TreeNode::leaf(id("Other"))]);
    }

    #[test]
    fn test_size_and_depth() {
        let trees = build_trees(&graph(&[("A", "B"), ("A", "C"), ("B", "C")])).unwrap();
        assert_eq!(trees[0].size(), 4);
        assert_eq!(trees[0].depth(), 2);
    }

    // =====================================================================
    // Property checks
    // =====================================================================

    fn dag_strategy() -> impl Strategy<Value = DependencyGraph> {
        proptest::collection::vec((0usize..8, 0usize..8), 0..16).prop_map(|pairs| {
            let mut graph = DependencyGraph::new();
            for (a, b) in pairs {
                let (from, to) = if a > b { (a, b) } else { (b, a) };
                graph.add_resource(Id::new(&format!("N{from}")));
                graph.add_dependency(Id::new(&format!("N{from}")), Id::new(&format!("N{to}")));
            }
            graph
        })
    }

    /// Every node's children equal the sorted dependencies of its resource.
    fn check_tree_matches_graph(node: &TreeNode, graph: &DependencyGraph) -> Result<(), TestCaseError> {
        let children: Vec<Id> = node.children().iter().map(TreeNode::name).collect();
        prop_assert_eq!(children, graph.dependencies(node.name()));
        for child in node.children() {
            check_tree_matches_graph(child, graph)?;
        }
        Ok(())
    }

    fn check_roots(graph: &DependencyGraph) -> Result<(), TestCaseError> {
        let trees = build_trees(graph).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let roots: Vec<Id> = trees.iter().map(TreeNode::name).collect();
        prop_assert_eq!(roots, graph.roots());
        for tree in &trees {
            check_tree_matches_graph(tree, graph)?;
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn trees_round_trip_graph(graph in dag_strategy()) {
            check_roots(&graph)?;
        }
    }
}
