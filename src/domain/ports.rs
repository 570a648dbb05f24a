use std::hash::Hash;

/// Read-only view over a live lineage graph (implemented by the renderer, or
/// by [`crate::domain::graph::LiveGraph`]).
///
/// Handles are cheap copies; edge handles double as edge identity for
/// traversal dedup.
pub trait GraphView {
    type NodeRef: Copy + Eq + Hash;
    type EdgeRef: Copy + Eq + Hash;

    fn in_edges(&self, node: Self::NodeRef) -> Vec<Self::EdgeRef>;
    fn out_edges(&self, node: Self::NodeRef) -> Vec<Self::EdgeRef>;

    fn source(&self, edge: Self::EdgeRef) -> Self::NodeRef;
    fn target(&self, edge: Self::EdgeRef) -> Self::NodeRef;

    fn source_anchor(&self, edge: Self::EdgeRef) -> &str;
    fn target_anchor(&self, edge: Self::EdgeRef) -> &str;

    fn id(&self, node: Self::NodeRef) -> &str;
}
