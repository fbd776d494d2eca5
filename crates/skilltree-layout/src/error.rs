//! Error types for the layout engine.

use thiserror::Error;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors that can occur while laying out a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A spacing value is negative, NaN, or infinite.
    #[error("invalid layout config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}
