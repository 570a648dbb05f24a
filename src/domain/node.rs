use crate::config::LayoutConfig;
use crate::domain::codec::TableId;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder coordinate; real positions come from the renderer's layout.
pub const DEFAULT_POSITION: f64 = 100.0;

/// One field row on a table node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attr {
    pub node_id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub attr_type: String,
}

/// A table node as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    pub id: String,
    pub key: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub level: u32,
    pub order: u32,
    pub attrs: Vec<Attr>,
    /// `[width, height]`.
    pub size: [f64; 2],
}

impl Node {
    /// Field-level node: one attribute row per field, height grows with the
    /// row count plus a header row.
    pub fn with_fields(table: &TableId, fields: &[String], layout: &LayoutConfig) -> Self {
        let id = table.to_string();
        let attrs: Vec<Attr> = fields
            .iter()
            .map(|field| Attr {
                node_id: id.clone(),
                key: field.clone(),
                attr_type: String::new(),
            })
            .collect();
        let height = layout.item_height * (attrs.len() + 1) as f64;
        Self::assemble(table, id, attrs, height, layout)
    }

    /// Collapsed node: no attribute rows, one row high.
    pub fn collapsed(table: &TableId, layout: &LayoutConfig) -> Self {
        let id = table.to_string();
        Self::assemble(table, id, Vec::new(), layout.item_height, layout)
    }

    fn assemble(
        table: &TableId,
        id: String,
        attrs: Vec<Attr>,
        height: f64,
        layout: &LayoutConfig,
    ) -> Self {
        let hierarchy = table.hierarchy(layout.max_level);
        Self {
            key: id.clone(),
            label: id.clone(),
            id,
            x: DEFAULT_POSITION,
            y: DEFAULT_POSITION,
            level: hierarchy.level,
            order: hierarchy.order,
            attrs,
            size: [layout.node_width, height],
        }
    }

    pub fn attr_keys(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|a| a.key.as_str())
    }
}
