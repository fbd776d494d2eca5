//! Skill Tree Layout
//!
//! Deterministic 2D placement of a skill graph for rendering.
//!
//! # Algorithm
//!
//! Placement is a single post-order pass from the root:
//!
//! - **Depth**: `y = level_gap × hops from root`; the root sits at `y = 0`.
//! - **Leaves** take the next slot on a horizontal cursor that starts at 0 and
//!   advances by `2 × node_radius + sibling_gap` after each leaf. Two leaves
//!   can therefore never overlap.
//! - **Internal nodes** are centered over the span of their children:
//!   `x = (first.x + last.x) / 2`. This is the span midpoint, not the centroid.
//!
//! Each node is placed exactly once. A child that is already placed (reached
//! earlier through another parent) or still on the current path (a cycle) is
//! not descended into again, so the pass is O(n) and always terminates.
//! Nodes the root cannot reach are left out of the result.
//!
//! # Output
//!
//! A [`Layout`] holds positioned nodes in pre-order, the connector edges
//! between them, and their [`Bounds`]. [`Viewport::fit`] turns bounds into a
//! padded canvas size and offsets.

mod bounds;
mod config;
mod engine;
mod error;

pub use bounds::{Bounds, Viewport};
pub use config::LayoutConfig;
pub use engine::{layout, Layout, LayoutEdge};
pub use error::{LayoutError, Result};

/// Default node circle radius
pub const DEFAULT_NODE_RADIUS: f64 = 30.0;

/// Default horizontal gap between adjacent leaf circles
pub const DEFAULT_SIBLING_GAP: f64 = 40.0;

/// Default vertical distance between tree levels
pub const DEFAULT_LEVEL_GAP: f64 = 160.0;

/// Default canvas padding around the bounds
pub const DEFAULT_VIEWPORT_PADDING: f64 = 30.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_leaf_pitch() {
        // 2 * 30 + 40 keeps the 100-unit spacing leaves have always used
        assert_eq!(LayoutConfig::default().leaf_pitch(), 100.0);
    }
}
