//! Leveled table as CSV.
//!
//! Header `Level,Resource,Dependencies`, one row per resource, dependencies
//! joined with `", "`. Fields are quoted only when they contain the
//! delimiter, a quote, or a line break, with quotes doubled.

use log::debug;

use super::{Error, Exporter};
use crate::levels::LevelTable;

const HEADER: [&str; 3] = ["Level", "Resource", "Dependencies"];

/// Writes [`LevelTable`]s as CSV text.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    line_terminator: &'static str,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            line_terminator: "\r\n",
        }
    }

    /// Use `terminator` instead of `\r\n` after every record.
    pub fn with_line_terminator(mut self, terminator: &'static str) -> Self {
        self.line_terminator = terminator;
        self
    }

    fn write_record<'a>(&self, out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
        for (idx, field) in fields.into_iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            write_field(out, field);
        }
        out.push_str(self.line_terminator);
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for CsvExporter {
    fn format(&self) -> &'static str {
        "csv"
    }

    fn export_levels(&self, levels: &LevelTable) -> Result<String, Error> {
        let mut out = String::new();
        self.write_record(&mut out, HEADER);

        for row in levels.rows() {
            let level = row.level().to_string();
            let resource = row.resource().to_string();
            let dependencies = row
                .dependencies()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            self.write_record(&mut out, [level.as_str(), resource.as_str(), dependencies.as_str()]);
        }

        debug!(rows = levels.len(), bytes = out.len(); "CSV exported");
        Ok(out)
    }
}

fn write_field(out: &mut String, field: &str) {
    let needs_quotes = field.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n'));
    if needs_quotes {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::DependencyGraph, levels::level_order, tree::TreeNode};
    use strata_core::identifier::Id;

    fn table(edges: &[(&str, &str)]) -> LevelTable {
        let mut graph = DependencyGraph::new();
        for (from, to) in edges {
            graph.add_dependency(Id::new(from), Id::new(to));
        }
        level_order(&graph).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let csv = CsvExporter::new()
            .export_levels(&table(&[("Patient", "Organization"), ("Patient", "Practitioner")]))
            .unwrap();

        assert_eq!(
            csv,
            "Level,Resource,Dependencies\r\n\
             0,Organization,\r\n\
             0,Practitioner,\r\n\
             1,Patient,\"Organization, Practitioner\"\r\n"
        );
    }

    #[test]
    fn test_single_dependency_unquoted() {
        let csv = CsvExporter::new()
            .with_line_terminator("\n")
            .export_levels(&table(&[("A", "B")]))
            .unwrap();
        assert_eq!(csv, "Level,Resource,Dependencies\n0,B,\n1,A,B\n");
    }

    #[test]
    fn test_empty_table_is_header_only() {
        let csv = CsvExporter::new().export_levels(&LevelTable::default()).unwrap();
        assert_eq!(csv, "Level,Resource,Dependencies\r\n");
    }

    #[test]
    fn test_field_quoting() {
        let mut out = String::new();
        write_field(&mut out, "say \"hi\"");
        assert_eq!(out, "\"say \"\"hi\"\"\"");

        let mut out = String::new();
        write_field(&mut out, "two\nlines");
        assert_eq!(out, "\"two\nlines\"");

        let mut out = String::new();
        write_field(&mut out, "plain");
        assert_eq!(out, "plain");
    }

    #[test]
    fn test_trees_unsupported() {
        let err = CsvExporter::new()
            .export_trees(&[TreeNode::leaf(Id::new("A"))])
            .unwrap_err();
        assert_eq!(err.to_string(), "csv export does not support dependency trees");
    }
}
