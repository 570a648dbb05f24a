pub mod builder;
pub mod codec;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod ports;
pub mod record;
pub mod traversal;
