//! Error types for the store crate.

use skilltree_graph::GraphError;
use skilltree_layout::LayoutError;
use skilltree_unlock::UnlockError;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, saving, or mutating a tree.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The node list could not be turned into a graph
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Layout configuration rejected
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Unlock refused
    #[error(transparent)]
    Unlock(#[from] UnlockError),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bad configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// An unlock was applied in memory but writing it out failed
    #[error("Unlock of {node} not saved: {source}")]
    PersistenceWrite {
        node: String,
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "rocksdb")]
impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
