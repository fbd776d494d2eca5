//! Error types for graph construction.

use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that abort graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two input nodes share the same id.
    #[error("duplicate node id: {0}")]
    DuplicateId(String),
}

/// A child reference that pointed at a node that does not exist.
///
/// Recovered during construction: the reference is dropped and kept here so
/// callers can report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("node {parent} references missing child {child}")]
pub struct DanglingReference {
    pub parent: String,
    pub child: String,
}
