//! lineage-graph library — lineage graph construction and impact traversal.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod server;
