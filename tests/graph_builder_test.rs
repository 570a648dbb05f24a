//! GraphBuilder integration tests over record fixtures.

mod common;

use std::collections::HashSet;

use lineage_graph::config::LayoutConfig;
use lineage_graph::domain::builder::{GraphBuilder, MalformedPolicy};
use lineage_graph::domain::codec::{self, TableId};
use lineage_graph::domain::error::BuildError;
use lineage_graph::domain::record::FieldRef;

use common::fixtures::{diamond, mixed, single_edge, with_malformed};

fn builder() -> GraphBuilder {
    GraphBuilder::new(LayoutConfig {
        item_height: 10.0,
        node_width: 100.0,
        max_level: 9,
    })
}

#[test]
fn test_single_record_produces_two_nodes_one_edge() {
    let out = builder().build_field_graph(&[single_edge("L1")]).unwrap();

    assert_eq!(out.graph.nodes.len(), 2);
    assert_eq!(out.graph.edges.len(), 1);
    assert_eq!(out.graph.edges[0].label.as_deref(), Some("L1"));
    assert!(out.graph.node("b_0-0").is_some());
    assert!(out.graph.node("y_1-0").is_some());
}

#[test]
fn test_resubmission_collapses_to_newest_label() {
    let out = builder()
        .build_field_graph(&[single_edge("L1"), single_edge("L2")])
        .unwrap();
    assert_eq!(out.graph.edges.len(), 1);
    assert_eq!(out.graph.edges[0].label.as_deref(), Some("L2"));
}

#[test]
fn test_mixed_field_graph_shape() {
    let out = builder().build_field_graph(&mixed()).unwrap();
    let graph = &out.graph;

    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["orders_1-0", "users", "items", "daily_2-0"]);

    let orders = graph.node("orders_1-0").unwrap();
    assert_eq!(
        orders.attr_keys().collect::<Vec<_>>(),
        vec!["user_id", "raw_user", "total"]
    );
    assert_eq!(orders.size, [100.0, 40.0]);
    assert_eq!((orders.level, orders.order), (1, 0));

    let users = graph.node("users").unwrap();
    assert_eq!(users.attr_keys().collect::<Vec<_>>(), vec!["id", "name"]);
    assert_eq!(users.level, 9);

    assert_eq!(graph.edges.len(), 4);
    let sum = graph
        .edges
        .iter()
        .find(|e| e.target == "daily_2-0")
        .unwrap();
    assert_eq!(sum.label.as_deref(), Some("sum v2"));
}

#[test]
fn test_no_self_loops_in_either_mode() {
    for records in [mixed(), diamond(), vec![single_edge("x")]] {
        let field = builder().build_field_graph(&records).unwrap();
        let table = builder().build_table_graph(&records).unwrap();
        for edge in field.graph.edges.iter().chain(table.graph.edges.iter()) {
            assert_ne!(edge.source, edge.target);
        }
    }
}

#[test]
fn test_edge_identities_are_unique() {
    let out = builder().build_field_graph(&mixed()).unwrap();
    let mut seen = HashSet::new();
    for edge in &out.graph.edges {
        let identity = (
            edge.source.clone(),
            edge.source_anchor.clone(),
            edge.target.clone(),
            edge.target_anchor.clone(),
        );
        assert!(seen.insert(identity), "duplicate edge {:?}", edge);
    }
}

#[test]
fn test_every_edge_endpoint_is_a_node() {
    for records in [mixed(), diamond()] {
        let out = builder().build_field_graph(&records).unwrap();
        let ids: HashSet<&str> = out.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &out.graph.edges {
            assert!(ids.contains(edge.source.as_str()));
            assert!(ids.contains(edge.target.as_str()));
        }
    }
}

#[test]
fn test_table_graph_keeps_identities_drops_attrs() {
    for records in [mixed(), diamond()] {
        let field = builder().build_field_graph(&records).unwrap();
        let table = builder().build_table_graph(&records).unwrap();

        let field_ids: Vec<&str> = field.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        let table_ids: Vec<&str> = table.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(field_ids, table_ids);

        for node in &table.graph.nodes {
            assert!(node.attrs.is_empty());
            assert_eq!(node.size, [100.0, 10.0]);
        }
    }
}

#[test]
fn test_table_graph_merges_parallel_field_edges() {
    let out = builder().build_table_graph(&mixed()).unwrap();
    assert_eq!(out.graph.edges.len(), 3);
    for edge in &out.graph.edges {
        assert_eq!(edge.source_anchor, edge.source);
        assert_eq!(edge.target_anchor, edge.target);
    }
}

#[test]
fn test_skip_policy_reports_malformed_record() {
    let out = builder().build_field_graph(&with_malformed()).unwrap();
    assert_eq!(out.skipped.len(), 1);
    assert_eq!(out.skipped[0].index, 1);
    assert_eq!(out.skipped[0].error.key, "users");

    let clean = builder().build_field_graph(&mixed()).unwrap();
    assert_eq!(out.graph, clean.graph);
}

#[test]
fn test_fail_fast_policy_names_record() {
    let err = builder()
        .with_policy(MalformedPolicy::FailFast)
        .build_table_graph(&with_malformed())
        .unwrap_err();
    let BuildError::Malformed { index, source } = err;
    assert_eq!(index, 1);
    assert_eq!(source.key, "users");
}

#[test]
fn test_decode_encode_agrees_with_node_ids() {
    let field = FieldRef::positioned(4, 2, "dw.orders.id");
    let location = codec::decode(&codec::encode(&field)).unwrap();
    assert_eq!(location.table, TableId::positioned("orders", 4, 2));

    let out = builder()
        .build_field_graph(&[lineage_graph::domain::record::LineageRecord::new(field)])
        .unwrap();
    assert_eq!(out.graph.nodes[0].id, location.table.to_string());
    assert_eq!(
        codec::hierarchy_of(&out.graph.nodes[0].id, 9),
        location.table.hierarchy(9)
    );
}
