//! Topological leveling of the dependency graph.
//!
//! Level 0 holds resources without dependencies. A resource lands on the
//! level after the highest level among its dependencies, so every dependency
//! sits on a strictly lower level and the level equals the length of the
//! longest dependency chain below the resource.

use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use strata_core::identifier::Id;

use crate::graph::DependencyGraph;

/// One row of the level table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelRow {
    level: usize,
    resource: Id,
    dependencies: Vec<Id>,
}

impl LevelRow {
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn resource(&self) -> Id {
        self.resource
    }

    /// Direct dependencies in lexicographic order.
    pub fn dependencies(&self) -> &[Id] {
        &self.dependencies
    }
}

/// Rows ordered by level, then by resource name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelTable {
    rows: Vec<LevelRow>,
}

impl LevelTable {
    pub fn rows(&self) -> &[LevelRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct levels.
    pub fn level_count(&self) -> usize {
        self.rows.last().map_or(0, |row| row.level + 1)
    }

    /// Level assigned to `resource`, if any.
    pub fn level_of(&self, resource: Id) -> Option<usize> {
        self.rows
            .iter()
            .find(|row| row.resource == resource)
            .map(LevelRow::level)
    }

    /// Rows of a single level.
    pub fn level(&self, level: usize) -> impl Iterator<Item = &LevelRow> {
        self.rows.iter().filter(move |row| row.level == level)
    }
}

/// The graph has a cycle; some resources could not be leveled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle detected among: {}", join(.unresolved))]
pub struct CycleDetected {
    unresolved: Vec<Id>,
    resolved: LevelTable,
}

impl CycleDetected {
    /// Resources that received no level, in lexicographic order.
    pub fn unresolved(&self) -> &[Id] {
        &self.unresolved
    }

    /// The levels emitted before the cycle stopped progress. Still valid.
    pub fn resolved(&self) -> &LevelTable {
        &self.resolved
    }
}

fn join(ids: &[Id]) -> String {
    ids.iter().map(Id::to_string).collect::<Vec<_>>().join(", ")
}

/// Assign levels to every resource of the graph, Kahn style.
///
/// Each round, every resource whose dependencies all have a level becomes
/// ready and gets the next level; ties within a level are broken by name.
///
/// # Errors
///
/// Returns [`CycleDetected`] when a round finds nothing ready while
/// resources remain. It carries the rows emitted so far.
pub fn level_order(graph: &DependencyGraph) -> Result<LevelTable, CycleDetected> {
    let resources = graph.resources();
    let mut pending: HashMap<Id, usize> = resources
        .iter()
        .map(|&resource| (resource, graph.dependencies(resource).len()))
        .collect();

    let mut ready: Vec<Id> = resources
        .iter()
        .copied()
        .filter(|resource| pending[resource] == 0)
        .collect();

    let mut rows = Vec::with_capacity(resources.len());
    let mut level = 0;

    while !ready.is_empty() {
        let mut next = Vec::new();
        for &resource in &ready {
            pending.remove(&resource);
            rows.push(LevelRow {
                level,
                resource,
                dependencies: graph.dependencies(resource),
            });
            for dependent in graph.dependents(resource) {
                if let Some(count) = pending.get_mut(&dependent) {
                    *count -= 1;
                    if *count == 0 {
                        next.push(dependent);
                    }
                }
            }
        }
        next.sort();
        ready = next;
        level += 1;
    }

    let table = LevelTable { rows };

    if !pending.is_empty() {
        let mut unresolved: Vec<Id> = pending.into_keys().collect();
        unresolved.sort();
        warn!(
            leveled = table.len(),
            unresolved = unresolved.len();
            "Cycle detected while leveling"
        );
        return Err(CycleDetected {
            unresolved,
            resolved: table,
        });
    }

    debug!(resources = table.len(), levels = table.level_count(); "Levels assigned");
    Ok(table)
}
