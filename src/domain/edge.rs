use crate::domain::codec::{FieldLocation, TableId};
use clap::ValueEnum;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A lineage edge as handed to the renderer. Data flows from source to target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: String,
    pub source_anchor: String,
    pub target: String,
    pub target_anchor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Granularity of the emitted graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    /// One edge per field pair, anchored on the fields.
    #[default]
    Field,
    /// One edge per table pair, anchored on the tables themselves.
    Table,
}

/// Structured edge identity. In table mode both anchors are the table
/// identities, so all field edges between two tables share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub source: TableId,
    pub source_anchor: String,
    pub target: TableId,
    pub target_anchor: String,
}

impl EdgeKey {
    pub fn between(source: &FieldLocation, target: &FieldLocation, mode: GraphMode) -> Self {
        match mode {
            GraphMode::Field => Self {
                source: source.table.clone(),
                source_anchor: source.field.clone(),
                target: target.table.clone(),
                target_anchor: target.field.clone(),
            },
            GraphMode::Table => Self {
                source: source.table.clone(),
                source_anchor: source.table.to_string(),
                target: target.table.clone(),
                target_anchor: target.table.to_string(),
            },
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    fn to_edge(&self, label: Option<String>) -> Edge {
        Edge {
            source: self.source.to_string(),
            source_anchor: self.source_anchor.clone(),
            target: self.target.to_string(),
            target_anchor: self.target_anchor.clone(),
            label,
        }
    }
}

/// Deduplicating edge store. An upsert for a known key overwrites the stored
/// edge in place; output order is the order keys were first seen.
#[derive(Debug, Default)]
pub struct EdgeRegistry {
    edges: Vec<Edge>,
    index: HashMap<EdgeKey, usize>,
}

impl EdgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the edge for `key`. Returns true if the key was new.
    pub fn upsert(&mut self, key: EdgeKey, label: Option<String>) -> bool {
        let edge = key.to_edge(label);
        match self.index.get(&key) {
            Some(&pos) => {
                self.edges[pos] = edge;
                false
            }
            None => {
                self.index.insert(key, self.edges.len());
                self.edges.push(edge);
                true
            }
        }
    }

    #[cfg(test)]
    fn get(&self, key: &EdgeKey) -> Option<&Edge> {
        self.index.get(key).map(|&pos| &self.edges[pos])
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}
