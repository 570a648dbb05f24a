use crate::app::dto::ImpactRequest;
use crate::app::engine::LineageEngine;
use crate::domain::edge::GraphMode;
use crate::domain::traversal::Direction;
use anyhow::Result;

/// Print the renderer-ready `{nodes, edges}` graph as JSON.
pub fn print_graph(engine: &LineageEngine, mode: GraphMode, pretty: bool) -> Result<()> {
    let graph = engine.lineage(mode);
    let output = if pretty {
        serde_json::to_string_pretty(&graph)?
    } else {
        serde_json::to_string(&graph)?
    };
    println!("{}", output);
    Ok(())
}

pub fn display_impact(
    engine: &LineageEngine,
    node: &str,
    anchor: Option<&str>,
    direction: Direction,
    mode: GraphMode,
    json: bool,
) -> Result<()> {
    let result = engine.impact(ImpactRequest {
        node: node.to_string(),
        anchor: anchor.map(String::from),
        direction,
        mode,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let arrow = match direction {
        Direction::Upstream => "Upstream",
        Direction::Downstream => "Downstream",
    };
    println!("{} impact of {}.{}", arrow, result.node, result.anchor);
    println!("{}", "=".repeat(60));
    println!("  Edges:  {}", result.edges.len());
    println!("  Tables: {}", result.tables.len());
    println!();

    for (i, edge) in result.edges.iter().enumerate() {
        print!(
            "{:>3}. {}.{} -> {}.{}",
            i + 1,
            edge.source,
            edge.source_anchor,
            edge.target,
            edge.target_anchor
        );
        if let Some(label) = &edge.label {
            print!("  [{}]", label);
        }
        println!();
    }

    Ok(())
}

pub fn display_health(engine: &LineageEngine) -> Result<()> {
    let health = engine.health();
    println!("Records: {}", health.records_path);
    println!("  Loaded:  {}", health.record_count);
    println!("  Skipped: {}", health.skipped_record_count);
    println!(
        "  Field graph: {} nodes, {} edges",
        health.field_graph.node_count, health.field_graph.edge_count
    );
    println!(
        "  Table graph: {} nodes, {} edges",
        health.table_graph.node_count, health.table_graph.edge_count
    );
    Ok(())
}
