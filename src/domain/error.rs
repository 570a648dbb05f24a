use thiserror::Error;

/// A compound key or field path that cannot be resolved to a table and field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed identifier '{key}': {reason}")]
pub struct MalformedIdentifierError {
    pub key: String,
    pub reason: String,
}

impl MalformedIdentifierError {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Graph construction failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("record {index} rejected: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: MalformedIdentifierError,
    },
}

/// A `{nodes, edges}` graph that cannot be instantiated as a live view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),
    #[error("edge {source_id} -> {target_id} references unknown node '{missing}'")]
    DanglingEdge {
        source_id: String,
        target_id: String,
        missing: String,
    },
}
