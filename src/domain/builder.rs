use crate::config::LayoutConfig;
use crate::domain::codec::{self, CompoundKey, FieldLocation, TableId};
use crate::domain::edge::{EdgeKey, EdgeRegistry, GraphMode};
use crate::domain::error::{BuildError, MalformedIdentifierError};
use crate::domain::graph::LineageGraph;
use crate::domain::node::Node;
use crate::domain::record::{FieldRef, LineageRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// What to do with a record whose identifiers cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Drop the record, report it in [`BuildOutput::skipped`], keep going.
    #[default]
    Skip,
    /// Abort the build on the first malformed record.
    FailFast,
}

/// A record left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub error: MalformedIdentifierError,
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: LineageGraph,
    pub skipped: Vec<SkippedRecord>,
}

/// Graph builder - turns lineage records into a renderable node/edge graph
pub struct GraphBuilder {
    layout: LayoutConfig,
    policy: MalformedPolicy,
}

impl GraphBuilder {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            policy: MalformedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// One node per table listing its fields, one edge per field pair.
    pub fn build_field_graph(&self, records: &[LineageRecord]) -> Result<BuildOutput, BuildError> {
        self.build(records, GraphMode::Field)
    }

    /// One node per table without fields, one edge per table pair.
    pub fn build_table_graph(&self, records: &[LineageRecord]) -> Result<BuildOutput, BuildError> {
        self.build(records, GraphMode::Table)
    }

    pub fn build(
        &self,
        records: &[LineageRecord],
        mode: GraphMode,
    ) -> Result<BuildOutput, BuildError> {
        let mut known = KnownFields::default();
        let mut edges = EdgeRegistry::new();
        let mut skipped = Vec::new();

        for (index, record) in records.iter().enumerate() {
            // Decode everything up front so a rejected record leaves no partial state.
            let resolved = match ResolvedRecord::resolve(record) {
                Ok(resolved) => resolved,
                Err(error) => match self.policy {
                    MalformedPolicy::Skip => {
                        warn!("Skipping lineage record {}: {}", index, error);
                        skipped.push(SkippedRecord { index, error });
                        continue;
                    }
                    MalformedPolicy::FailFast => {
                        return Err(BuildError::Malformed {
                            index,
                            source: error,
                        });
                    }
                },
            };

            known.insert(resolved.target.key, resolved.target.location.clone());

            for (reference, label) in resolved.refs {
                known.insert(reference.key, reference.location.clone());

                let key = EdgeKey::between(&reference.location, &resolved.target.location, mode);
                if key.is_self_loop() {
                    trace!("Dropping self-loop on table {}", key.source);
                    continue;
                }
                edges.upsert(key, label);
            }
        }

        let nodes = match mode {
            GraphMode::Field => self.field_nodes(&known),
            GraphMode::Table => self.table_nodes(&known),
        };
        let edges = edges.into_edges();

        debug!(
            "Built {:?} graph: {} records, {} nodes, {} edges, {} skipped",
            mode,
            records.len(),
            nodes.len(),
            edges.len(),
            skipped.len()
        );

        Ok(BuildOutput {
            graph: LineageGraph { nodes, edges },
            skipped,
        })
    }

    fn field_nodes(&self, known: &KnownFields) -> Vec<Node> {
        let mut tables: Vec<(TableId, Vec<String>)> = Vec::new();
        let mut table_pos: HashMap<TableId, usize> = HashMap::new();

        for location in &known.locations {
            let pos = *table_pos.entry(location.table.clone()).or_insert_with(|| {
                tables.push((location.table.clone(), Vec::new()));
                tables.len() - 1
            });
            let fields = &mut tables[pos].1;
            if !fields.contains(&location.field) {
                fields.push(location.field.clone());
            }
        }

        tables
            .iter()
            .map(|(table, fields)| Node::with_fields(table, fields, &self.layout))
            .collect()
    }

    fn table_nodes(&self, known: &KnownFields) -> Vec<Node> {
        let mut seen: HashSet<&TableId> = HashSet::new();
        let mut nodes = Vec::new();
        for location in &known.locations {
            if seen.insert(&location.table) {
                nodes.push(Node::collapsed(&location.table, &self.layout));
            }
        }
        nodes
    }
}

/// Insertion-ordered set of field keys seen during one build.
#[derive(Default)]
struct KnownFields {
    keys: HashSet<CompoundKey>,
    locations: Vec<FieldLocation>,
}

impl KnownFields {
    fn insert(&mut self, key: CompoundKey, location: FieldLocation) {
        if self.keys.insert(key) {
            self.locations.push(location);
        }
    }
}

struct ResolvedField {
    key: CompoundKey,
    location: FieldLocation,
}

impl ResolvedField {
    fn resolve(field: &FieldRef) -> Result<Self, MalformedIdentifierError> {
        let key = codec::encode(field);
        let location = codec::decode(&key)?;
        Ok(Self { key, location })
    }
}

struct ResolvedRecord {
    target: ResolvedField,
    refs: Vec<(ResolvedField, Option<String>)>,
}

impl ResolvedRecord {
    fn resolve(record: &LineageRecord) -> Result<Self, MalformedIdentifierError> {
        let target = ResolvedField::resolve(&record.target_field)?;
        let refs = record
            .refs()
            .iter()
            .map(|r| Ok((ResolvedField::resolve(&r.field)?, r.label.clone())))
            .collect::<Result<Vec<_>, MalformedIdentifierError>>()?;
        Ok(Self { target, refs })
    }
}
