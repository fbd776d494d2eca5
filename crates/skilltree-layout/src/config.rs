//! Spacing configuration.

use crate::error::{LayoutError, Result};
use crate::{DEFAULT_LEVEL_GAP, DEFAULT_NODE_RADIUS, DEFAULT_SIBLING_GAP};

/// Spacing parameters for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Radius of a rendered node
    pub node_radius: f64,
    /// Horizontal gap between neighbouring leaves
    pub sibling_gap: f64,
    /// Vertical distance between levels
    pub level_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_radius: DEFAULT_NODE_RADIUS,
            sibling_gap: DEFAULT_SIBLING_GAP,
            level_gap: DEFAULT_LEVEL_GAP,
        }
    }
}

impl LayoutConfig {
    pub const fn new(node_radius: f64, sibling_gap: f64, level_gap: f64) -> Self {
        Self {
            node_radius,
            sibling_gap,
            level_gap,
        }
    }

    /// Distance between consecutive leaves: `2 × node_radius + sibling_gap`.
    #[inline]
    pub fn leaf_pitch(&self) -> f64 {
        2.0 * self.node_radius + self.sibling_gap
    }

    /// Reject negative or non-finite spacing.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("node_radius", self.node_radius),
            ("sibling_gap", self.sibling_gap),
            ("level_gap", self.level_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}
