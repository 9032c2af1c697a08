//! Dependency trees as pretty-printed JSON.

use log::debug;

use super::{Error, Exporter};
use crate::{levels::LevelTable, tree::TreeNode};

/// Writes trees (and level tables) as two-space indented JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for JsonExporter {
    fn format(&self) -> &'static str {
        "json"
    }

    /// An array of `{"level", "resource", "dependencies"}` objects.
    fn export_levels(&self, levels: &LevelTable) -> Result<String, Error> {
        let out = serde_json::to_string_pretty(levels)?;
        debug!(rows = levels.len(), bytes = out.len(); "JSON levels exported");
        Ok(out)
    }

    /// An array of root objects `{"name", "children"}`.
    fn export_trees(&self, trees: &[TreeNode]) -> Result<String, Error> {
        let out = serde_json::to_string_pretty(trees)?;
        debug!(roots = trees.len(), bytes = out.len(); "JSON trees exported");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::DependencyGraph, levels::level_order};
    use strata_core::identifier::Id;

    #[test]
    fn test_tree_layout() {
        let trees = vec![TreeNode::new(
            Id::new("Patient"),
            vec![TreeNode::leaf(Id::new("Organization"))],
        )];

        let json = JsonExporter::new().export_trees(&trees).unwrap();
        assert_eq!(
            json,
            r#"[
  {
    "name": "Patient",
    "children": [
      {
        "name": "Organization"
      }
    ]
  }
]"#
        );
    }

    #[test]
    fn test_empty_forest() {
        assert_eq!(JsonExporter::new().export_trees(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_trees_parse_back() {
        let trees = vec![
            TreeNode::new(Id::new("A"), vec![TreeNode::leaf(Id::new("B"))]),
            TreeNode::leaf(Id::new("C")),
        ];
        let json = JsonExporter::new().export_trees(&trees).unwrap();
        let parsed: Vec<TreeNode> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, trees);
    }

    #[test]
    fn test_level_rows() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(Id::new("A"), Id::new("B"));
        let table = level_order(&graph).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&JsonExporter::new().export_levels(&table).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "level": 0, "resource": "B", "dependencies": [] },
                { "level": 1, "resource": "A", "dependencies": ["B"] }
            ])
        );
    }
}
