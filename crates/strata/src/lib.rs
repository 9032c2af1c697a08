//! Strata - dependency leveling for schema resource documents.
//!
//! Reads a set of schema documents, assigns every type to the resource of
//! the document defining it, and derives a resource dependency graph. The
//! graph is leveled topologically (a flat table) and expanded into nested
//! trees rooted at resources nothing depends on.

pub mod config;
pub mod export;
pub mod graph;
pub mod levels;
pub mod tree;

mod error;

pub use strata_core::{identifier, vocabulary};
pub use strata_parser::{ConflictPolicy, Corpus, Document};

pub use error::StrataError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{Exporter, csv::CsvExporter, json::JsonExporter};
use graph::DependencyGraph;
use levels::LevelTable;
use tree::TreeNode;

/// Everything derived from one set of documents.
#[derive(Debug, Clone)]
pub struct Analysis {
    corpus: Corpus,
    graph: DependencyGraph,
    levels: LevelTable,
    trees: Vec<TreeNode>,
}

impl Analysis {
    /// Resources, their references, and type ownership.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn trees(&self) -> &[TreeNode] {
        &self.trees
    }
}

/// Runs the analysis pipeline over schema documents.
///
/// # Examples
///
/// ```rust
/// use strata::{Analyzer, Document, config::AppConfig};
///
/// let documents = [
///     Document::new("patient.graphql", "type Patient implements IDomainResource { org: Organization }"),
///     Document::new("organization.graphql", "type Organization implements IDomainResource { name: String }"),
/// ];
///
/// let analyzer = Analyzer::new(AppConfig::default());
/// let analysis = analyzer.analyze(&documents).expect("Failed to analyze");
///
/// let csv = analyzer.render_csv(analysis.levels()).expect("Failed to render");
/// assert!(csv.contains("1,Patient,Organization"));
/// ```
#[derive(Debug, Default)]
pub struct Analyzer {
    config: AppConfig,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Vocabulary, conflict policy and discovery settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Extract, resolve and merge documents into a corpus.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Resolve`] when the conflict policy rejects the
    /// corpus.
    pub fn parse(&self, documents: &[Document]) -> Result<Corpus, StrataError> {
        info!(documents = documents.len(); "Parsing documents");

        let corpus = strata_parser::parse(documents, &self.config.resolve_config())
            .map_err(|err| StrataError::new_resolve_error(err, documents))?;

        debug!(
            resources = corpus.resource_count(),
            warnings = corpus.warnings().len();
            "Documents parsed"
        );
        Ok(corpus)
    }

    /// Build the dependency graph of a corpus.
    pub fn build_graph(&self, corpus: &Corpus) -> DependencyGraph {
        graph::build_graph(corpus.ownership(), corpus.resources(), self.config.vocabulary())
    }

    /// Run the full pipeline: parse, graph, levels, then trees.
    ///
    /// Trees are only built once leveling has shown the graph is acyclic.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Resolve`] for rejected conflicts and
    /// [`StrataError::Cycle`] with the partial level table when the graph
    /// has a cycle.
    pub fn analyze(&self, documents: &[Document]) -> Result<Analysis, StrataError> {
        let corpus = self.parse(documents)?;
        self.analyze_corpus(corpus)
    }

    /// Run graph, levels and trees over an already parsed corpus.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Cycle`] when the graph has a cycle.
    pub fn analyze_corpus(&self, corpus: Corpus) -> Result<Analysis, StrataError> {
        let graph = self.build_graph(&corpus);

        info!(
            resources = graph.resource_count(),
            dependencies = graph.dependency_count();
            "Leveling dependency graph"
        );
        let levels = levels::level_order(&graph)?;

        let trees = tree::build_trees(&graph)?;
        info!(levels = levels.level_count(), roots = trees.len(); "Analysis complete");
        trace!(trees:? = trees; "Dependency trees");

        Ok(Analysis {
            corpus,
            graph,
            levels,
            trees,
        })
    }

    /// Render a level table as CSV.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Export`] if the table cannot be written.
    pub fn render_csv(&self, levels: &LevelTable) -> Result<String, StrataError> {
        Ok(CsvExporter::new().export_levels(levels)?)
    }

    /// Render dependency trees as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Export`] if serialization fails.
    pub fn render_json(&self, trees: &[TreeNode]) -> Result<String, StrataError> {
        Ok(JsonExporter::new().export_trees(trees)?)
    }
}
