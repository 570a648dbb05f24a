use crate::domain::builder::SkippedRecord;
use crate::domain::edge::{Edge, GraphMode};
use crate::domain::node::Node;
use crate::domain::traversal::Direction;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub records_path: String,
    pub record_count: usize,
    pub skipped_record_count: usize,
    pub field_graph: GraphSize,
    pub table_graph: GraphSize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GraphSize {
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GraphRequest {
    #[serde(default)]
    pub mode: GraphMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GraphResponse {
    pub mode: GraphMode,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub skipped: Vec<SkippedRecordDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SkippedRecordDto {
    /// Position of the record in the input file (0-based).
    pub index: usize,
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImpactRequest {
    /// Node id, e.g. `orders_1-0` or `orders`.
    pub node: String,
    /// Field on the node. Required in field mode; in table mode it defaults
    /// to the node id.
    pub anchor: Option<String>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub mode: GraphMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImpactResponse {
    pub node: String,
    pub anchor: String,
    pub direction: Direction,
    pub edges: Vec<Edge>,
    /// Every node touched by the impact set, in discovery order.
    pub tables: Vec<String>,
}

impl From<&SkippedRecord> for SkippedRecordDto {
    fn from(skipped: &SkippedRecord) -> Self {
        Self {
            index: skipped.index,
            key: skipped.error.key.clone(),
            reason: skipped.error.reason.clone(),
        }
    }
}
