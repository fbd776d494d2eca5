//! Skill Tree Graph Model
//!
//! In-memory representation of a skill tree: learning nodes joined by
//! prerequisite edges, each carrying an unlock flag.
//!
//! # Shape
//!
//! A tree arrives as a flat list of [`SkillNode`]s where every node names its
//! children by id. [`build_graph`] turns that list into a [`Graph`]:
//!
//! - ids are unique (a duplicate is a [`GraphError::DuplicateId`])
//! - child references to missing ids are dropped and recorded as
//!   [`DanglingReference`]s instead of failing the whole tree
//! - a child→parents index is built once, so parent lookup is O(1)
//!
//! Forward edges are fixed after construction. The only mutable state is the
//! per-node `unlocked` flag, which the unlock crate flips through
//! [`Graph::set_unlocked`].
//!
//! # Multiple Parents
//!
//! Nodes may have several parents. [`Graph::find_parent`] returns the first
//! one in input order (the "governing" parent); [`Graph::parents`] returns
//! them all.

mod error;
mod graph;
mod node;

pub use error::{DanglingReference, GraphError, Result};
pub use graph::{build_graph, build_graph_with_root, Graph};
pub use node::{Icon, IconLibrary, Position, SkillNode, UnknownIconLibrary};
