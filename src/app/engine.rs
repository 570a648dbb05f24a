use crate::app::dto::*;
use crate::config::AppConfig;
use crate::domain::builder::{GraphBuilder, SkippedRecord};
use crate::domain::edge::GraphMode;
use crate::domain::graph::{LineageGraph, LiveGraph};
use crate::domain::record::LineageRecord;
use crate::domain::traversal;
use anyhow::{Context as _, Result, anyhow, bail};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, info};

/// Shared, reloadable lineage state: the records file, both graph variants
/// and their live views.
#[derive(Clone)]
pub struct LineageEngine {
    inner: Arc<RwLock<EngineData>>,
}

struct EngineData {
    records_path: PathBuf,
    config: AppConfig,
    record_count: usize,
    skipped: Vec<SkippedRecord>,
    field: Arc<BuiltGraph>,
    table: Arc<BuiltGraph>,
}

struct BuiltGraph {
    lineage: LineageGraph,
    live: LiveGraph,
}

impl BuiltGraph {
    fn size(&self) -> GraphSize {
        GraphSize {
            node_count: self.live.node_count(),
            edge_count: self.live.edge_count(),
        }
    }
}

impl EngineData {
    fn build(records_path: PathBuf, records: &[LineageRecord], config: AppConfig) -> Result<Self> {
        let builder =
            GraphBuilder::new(config.layout.clone()).with_policy(config.malformed_policy);

        let field = builder
            .build_field_graph(records)
            .context("Failed to build field-level lineage graph")?;
        let table = builder
            .build_table_graph(records)
            .context("Failed to build table-level lineage graph")?;

        let field_live = LiveGraph::from_lineage(&field.graph)
            .context("Failed to instantiate field-level graph")?;
        let table_live = LiveGraph::from_lineage(&table.graph)
            .context("Failed to instantiate table-level graph")?;

        info!(
            "Loaded {} lineage records ({} skipped): {} tables, {} field edges, {} table edges",
            records.len(),
            field.skipped.len(),
            field_live.node_count(),
            field_live.edge_count(),
            table_live.edge_count()
        );

        Ok(Self {
            records_path,
            config,
            record_count: records.len(),
            skipped: field.skipped,
            field: Arc::new(BuiltGraph {
                lineage: field.graph,
                live: field_live,
            }),
            table: Arc::new(BuiltGraph {
                lineage: table.graph,
                live: table_live,
            }),
        })
    }

    fn graph(&self, mode: GraphMode) -> &BuiltGraph {
        match mode {
            GraphMode::Field => &self.field,
            GraphMode::Table => &self.table,
        }
    }

    fn health(&self) -> HealthResponse {
        HealthResponse {
            records_path: self.records_path.to_string_lossy().to_string(),
            record_count: self.record_count,
            skipped_record_count: self.skipped.len(),
            field_graph: self.field.size(),
            table_graph: self.table.size(),
        }
    }
}

impl LineageEngine {
    /// Construct an engine from records already in memory.
    pub fn from_records(
        records_path: PathBuf,
        records: &[LineageRecord],
        config: AppConfig,
    ) -> Result<Self> {
        let data = EngineData::build(records_path, records, config)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(data)),
        })
    }

    pub fn load_from_json(json_path: &Path, config: AppConfig) -> Result<Self> {
        let records = read_records(json_path)?;
        Self::from_records(json_path.to_path_buf(), &records, config)
    }

    /// Re-read the records file and swap in freshly built graphs.
    pub fn reload(&self) -> Result<HealthResponse> {
        let (path, config) = {
            let data = self.read();
            (data.records_path.clone(), data.config.clone())
        };
        let records = read_records(&path)?;
        let fresh = EngineData::build(path, &records, config)?;

        let mut data = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *data = fresh;
        Ok(data.health())
    }

    pub fn health(&self) -> HealthResponse {
        self.read().health()
    }

    pub fn graph(&self, req: GraphRequest) -> GraphResponse {
        let data = self.read();
        let built = data.graph(req.mode);
        GraphResponse {
            mode: req.mode,
            nodes: built.lineage.nodes.clone(),
            edges: built.lineage.edges.clone(),
            skipped: data.skipped.iter().map(SkippedRecordDto::from).collect(),
        }
    }

    /// The raw builder output for one graph variant.
    pub fn lineage(&self, mode: GraphMode) -> LineageGraph {
        self.read().graph(mode).lineage.clone()
    }

    pub fn impact(&self, req: ImpactRequest) -> Result<ImpactResponse> {
        let built = {
            let data = self.read();
            Arc::clone(match req.mode {
                GraphMode::Field => &data.field,
                GraphMode::Table => &data.table,
            })
        };
        let live = &built.live;

        let start = live
            .node_by_id(&req.node)
            .ok_or_else(|| anyhow!("Node not found: {}", req.node))?;
        // Table-mode anchors are the table ids; field mode has no such default.
        let anchor = match (req.anchor, req.mode) {
            (Some(anchor), _) => anchor,
            (None, GraphMode::Table) => req.node.clone(),
            (None, GraphMode::Field) => {
                bail!("Field-mode impact on {} needs an anchor field", req.node)
            }
        };

        let edges = traversal::collect(live, req.direction, start, &anchor);
        debug!(
            "Impact {:?} from {}:{} -> {} edges",
            req.direction,
            req.node,
            anchor,
            edges.len()
        );

        let mut seen = HashSet::new();
        let mut tables = Vec::new();
        let mut impacted = Vec::with_capacity(edges.len());
        for idx in edges {
            let edge = live.edge(idx);
            for id in [&edge.source, &edge.target] {
                if seen.insert(id.as_str()) {
                    tables.push(id.clone());
                }
            }
            impacted.push(edge.clone());
        }

        Ok(ImpactResponse {
            node: req.node,
            anchor,
            direction: req.direction,
            edges: impacted,
            tables,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn read_records(json_path: &Path) -> Result<Vec<LineageRecord>> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read records file: {}", json_path.display()))?;
    serde_json::from_str(&json_content).context("Failed to parse lineage records JSON")
}
