use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lineage_graph::app::engine::LineageEngine;
use lineage_graph::cli;
use lineage_graph::config::AppConfig;
use lineage_graph::domain::edge::GraphMode;
use lineage_graph::domain::traversal::Direction;
use lineage_graph::server::{http, mcp::LineageMcpServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lineage-graph")]
#[command(about = "Build field-level lineage graphs and compute upstream/downstream impact")]
#[command(version)]
struct Cli {
    /// Path to the lineage records JSON file
    records: PathBuf,

    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Row height per attribute
    #[arg(long)]
    item_height: Option<f64>,

    /// Node width
    #[arg(long)]
    node_width: Option<f64>,

    /// Tier for tables without a grid position
    #[arg(long)]
    max_level: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the graph as renderer-ready JSON
    Build {
        #[arg(short, long, value_enum, default_value = "field")]
        mode: GraphMode,

        #[arg(long)]
        pretty: bool,
    },

    /// Compute the impact set of a field
    Impact {
        /// Node id (table identity, e.g. orders_1-0)
        node: String,

        /// Field on the node (required in field mode; table mode uses the node id)
        anchor: Option<String>,

        #[arg(short, long, value_enum, default_value = "upstream")]
        direction: Direction,

        #[arg(short, long, value_enum, default_value = "field")]
        mode: GraphMode,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize the loaded records
    Health,

    /// Serve the engine over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Serve the engine as an MCP server on stdio
    Mcp,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = load_config(&cli)?;
    let engine = LineageEngine::load_from_json(&cli.records, config)
        .with_context(|| format!("Failed to load lineage records: {}", cli.records.display()))?;

    match cli.command {
        Commands::Build { mode, pretty } => cli::print_graph(&engine, mode, pretty)?,
        Commands::Impact {
            node,
            anchor,
            direction,
            mode,
            json,
        } => cli::display_impact(
            &engine,
            &node,
            anchor.as_deref(),
            direction,
            mode,
            json,
        )?,
        Commands::Health => cli::display_health(&engine)?,
        Commands::Serve { host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .context("Invalid listen address")?;
            http::serve(engine, addr).await?;
        }
        Commands::Mcp => LineageMcpServer::new(engine).serve_stdio().await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(item_height) = cli.item_height {
        config.layout.item_height = item_height;
    }
    if let Some(node_width) = cli.node_width {
        config.layout.node_width = node_width;
    }
    if let Some(max_level) = cli.max_level {
        config.layout.max_level = max_level;
    }
    Ok(config)
}

/// Logs go to stderr; stdout carries graph JSON and MCP traffic.
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(env_filter)
        .init();

    Ok(())
}
