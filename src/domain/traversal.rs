//! Impact traversal over a live graph view.
//!
//! Starting from a selected `(node, anchor)`, upstream collection follows
//! edges whose target is the current node/anchor and continues from each
//! edge's source anchor; downstream collection is the mirror image. Edges are
//! deduplicated by identity, and each `(node, anchor)` is expanded at most
//! once, so diamonds are merged and cycles terminate.

use crate::domain::ports::GraphView;
use clap::ValueEnum;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Upstream,
    Downstream,
}

/// Ordered edge accumulator with identity-based membership.
#[derive(Debug, Clone)]
pub struct ImpactSet<E> {
    edges: Vec<E>,
    members: HashSet<E>,
}

impl<E: Copy + Eq + Hash> Default for ImpactSet<E> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<E: Copy + Eq + Hash> ImpactSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, edge: &E) -> bool {
        self.members.contains(edge)
    }

    /// Returns false if the edge was already collected.
    pub fn insert(&mut self, edge: E) -> bool {
        if self.members.insert(edge) {
            self.edges.push(edge);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.edges
    }

    pub fn into_vec(self) -> Vec<E> {
        self.edges
    }
}

/// Collect every edge feeding `anchor` on `node`, transitively.
pub fn collect_upstream<G: GraphView>(
    view: &G,
    candidates: &[G::EdgeRef],
    node: G::NodeRef,
    anchor: &str,
    acc: &mut ImpactSet<G::EdgeRef>,
) {
    walk(view, Direction::Upstream, candidates, node, anchor, acc);
}

/// Collect every edge fed by `anchor` on `node`, transitively.
pub fn collect_downstream<G: GraphView>(
    view: &G,
    candidates: &[G::EdgeRef],
    node: G::NodeRef,
    anchor: &str,
    acc: &mut ImpactSet<G::EdgeRef>,
) {
    walk(view, Direction::Downstream, candidates, node, anchor, acc);
}

/// Impact set of a selection, starting from the node's own edges.
pub fn collect<G: GraphView>(
    view: &G,
    direction: Direction,
    node: G::NodeRef,
    anchor: &str,
) -> Vec<G::EdgeRef> {
    let candidates = adjacent(view, direction, node);
    let mut acc = ImpactSet::new();
    walk(view, direction, &candidates, node, anchor, &mut acc);
    acc.into_vec()
}

pub fn upstream<G: GraphView>(view: &G, node: G::NodeRef, anchor: &str) -> Vec<G::EdgeRef> {
    collect(view, Direction::Upstream, node, anchor)
}

pub fn downstream<G: GraphView>(view: &G, node: G::NodeRef, anchor: &str) -> Vec<G::EdgeRef> {
    collect(view, Direction::Downstream, node, anchor)
}

fn adjacent<G: GraphView>(view: &G, direction: Direction, node: G::NodeRef) -> Vec<G::EdgeRef> {
    match direction {
        Direction::Upstream => view.in_edges(node),
        Direction::Downstream => view.out_edges(node),
    }
}

fn walk<G: GraphView>(
    view: &G,
    direction: Direction,
    candidates: &[G::EdgeRef],
    node: G::NodeRef,
    anchor: &str,
    acc: &mut ImpactSet<G::EdgeRef>,
) {
    let mut expanded: HashSet<(G::NodeRef, String)> = HashSet::new();
    expanded.insert((node, anchor.to_string()));

    let mut stack = Vec::new();
    push_matching(view, direction, candidates, node, anchor, acc, &mut stack);

    // Depth-first, preorder: an edge is collected before anything behind it.
    while let Some(edge) = stack.pop() {
        if !acc.insert(edge) {
            continue;
        }

        let (next, next_anchor) = match direction {
            Direction::Upstream => (view.source(edge), view.source_anchor(edge)),
            Direction::Downstream => (view.target(edge), view.target_anchor(edge)),
        };
        if !expanded.insert((next, next_anchor.to_string())) {
            continue;
        }

        let next_candidates = adjacent(view, direction, next);
        push_matching(view, direction, &next_candidates, next, next_anchor, acc, &mut stack);
    }
}

fn push_matching<G: GraphView>(
    view: &G,
    direction: Direction,
    candidates: &[G::EdgeRef],
    node: G::NodeRef,
    anchor: &str,
    acc: &ImpactSet<G::EdgeRef>,
    stack: &mut Vec<G::EdgeRef>,
) {
    let node_id = view.id(node);
    let matching = candidates.iter().copied().filter(|&edge| {
        if acc.contains(&edge) {
            return false;
        }
        match direction {
            Direction::Upstream => {
                view.id(view.target(edge)) == node_id && view.target_anchor(edge) == anchor
            }
            Direction::Downstream => {
                view.id(view.source(edge)) == node_id && view.source_anchor(edge) == anchor
            }
        }
    });
    let start = stack.len();
    stack.extend(matching);
    stack[start..].reverse();
}
