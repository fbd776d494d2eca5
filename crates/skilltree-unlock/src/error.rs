//! Error types for unlock attempts.

use thiserror::Error;

/// Result type for unlock attempts.
pub type Result<T> = std::result::Result<T, UnlockError>;

/// Reasons an unlock attempt is refused.
///
/// These are ordinary outcomes the UI reports to the user, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    /// The gating parent has not been unlocked yet.
    #[error("cannot unlock {node}: prerequisite {parent} is still locked")]
    PrerequisiteLocked { node: String, parent: String },

    /// No node with this id exists in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),
}
