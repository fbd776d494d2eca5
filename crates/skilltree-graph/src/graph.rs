//! Graph construction and edge queries.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{DanglingReference, GraphError, Result};
use crate::node::SkillNode;

/// An id-keyed skill graph with a derived child→parents index.
///
/// Nodes keep their input order, which is also the order parent lookup
/// scans in.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<SkillNode>,
    index: HashMap<String, usize>,
    /// child id -> parent positions in `nodes`, ascending
    parents: HashMap<String, Vec<usize>>,
    root: Option<usize>,
    dangling: Vec<DanglingReference>,
}

/// Build a graph, picking the root automatically.
///
/// The root is the first node (input order) nothing points at, or the first
/// node when every node has a parent.
pub fn build_graph(nodes: Vec<SkillNode>) -> Result<Graph> {
    build_graph_with_root(nodes, None)
}

/// Build a graph with an optionally designated root.
///
/// A designated root that does not exist falls back to automatic selection.
pub fn build_graph_with_root(mut nodes: Vec<SkillNode>, root: Option<&str>) -> Result<Graph> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id.clone(), i).is_some() {
            return Err(GraphError::DuplicateId(node.id.clone()));
        }
    }

    let mut dangling = Vec::new();
    for node in nodes.iter_mut() {
        let mut seen = HashSet::with_capacity(node.children.len());
        let parent = node.id.as_str();
        node.children.retain(|child| {
            if !index.contains_key(child) {
                warn!("Dropping reference from {} to missing node {}", parent, child);
                dangling.push(DanglingReference {
                    parent: parent.to_string(),
                    child: child.clone(),
                });
                return false;
            }
            if !seen.insert(child.clone()) {
                debug!("Collapsing repeated child {} under {}", child, parent);
                return false;
            }
            true
        });
    }

    let mut parents: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        for child in &node.children {
            parents.entry(child.clone()).or_default().push(i);
        }
    }

    let designated = match root {
        Some(id) => {
            let found = index.get(id).copied();
            if found.is_none() {
                warn!("Designated root {} not found, selecting automatically", id);
            }
            found
        }
        None => None,
    };
    let root = designated.or_else(|| {
        nodes
            .iter()
            .position(|n| !parents.contains_key(&n.id))
            .or(if nodes.is_empty() { None } else { Some(0) })
    });

    Ok(Graph {
        nodes,
        index,
        parents,
        root,
        dangling,
    })
}

impl Graph {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> &[SkillNode] {
        &self.nodes
    }

    /// Consume the graph, returning its nodes in input order.
    pub fn into_nodes(self) -> Vec<SkillNode> {
        self.nodes
    }

    /// Find a node by id.
    pub fn get(&self, id: &str) -> Option<&SkillNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a node in input order.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The root node, if the graph is non-empty.
    pub fn root(&self) -> Option<&SkillNode> {
        self.root.map(|i| &self.nodes[i])
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root().map(|n| n.id.as_str())
    }

    /// Child references dropped during construction.
    pub fn dangling(&self) -> &[DanglingReference] {
        &self.dangling
    }

    /// The governing parent: the first node in input order listing `child_id`.
    ///
    /// `None` for the root and for ids nothing references.
    pub fn find_parent(&self, child_id: &str) -> Option<&SkillNode> {
        self.parents
            .get(child_id)
            .and_then(|ps| ps.first())
            .map(|&i| &self.nodes[i])
    }

    /// Every parent of `child_id`, in input order.
    pub fn parents(&self, child_id: &str) -> Vec<&SkillNode> {
        self.parents
            .get(child_id)
            .map(|ps| ps.iter().map(|&i| &self.nodes[i]).collect())
            .unwrap_or_default()
    }

    /// Children of `parent_id`, in display order.
    pub fn find_children(&self, parent_id: &str) -> Vec<&SkillNode> {
        self.get(parent_id)
            .map(|n| n.children.iter().filter_map(|c| self.get(c)).collect())
            .unwrap_or_default()
    }

    /// Every `(parent, child)` edge.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|n| n.children.iter().map(move |c| (n.id.as_str(), c.as_str())))
    }

    /// Set a node's unlock flag, returning the previous value.
    ///
    /// Performs no prerequisite check; use `skilltree-unlock` for that.
    pub fn set_unlocked(&mut self, id: &str) -> Option<bool> {
        let i = *self.index.get(id)?;
        let node = &mut self.nodes[i];
        let previous = node.unlocked;
        node.unlocked = true;
        Some(previous)
    }
}
