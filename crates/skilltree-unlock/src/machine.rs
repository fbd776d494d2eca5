//! Unlock transitions.

use skilltree_graph::{Graph, SkillNode};
use tracing::debug;

use crate::error::{Result, UnlockError};

/// Per-node state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeState {
    Locked,
    Unlocked,
}

/// Successful outcomes of an unlock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnlockOutcome {
    /// The node flipped from locked to unlocked. Persist it.
    Unlocked,
    /// The node was already unlocked; nothing changed.
    AlreadyUnlocked,
}

/// Which parents must be unlocked before a child may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnlockPolicy {
    /// Only the first parent in input order gates the child.
    #[default]
    FirstParent,
    /// Every parent must be unlocked.
    AllParents,
    /// Any one unlocked parent is enough.
    AnyParent,
}

impl UnlockPolicy {
    /// The locked parent standing in the way of `id`, if any.
    fn blocker<'g>(&self, graph: &'g Graph, id: &str) -> Option<&'g SkillNode> {
        match self {
            Self::FirstParent => graph.find_parent(id).filter(|p| !p.unlocked),
            Self::AllParents => graph.parents(id).into_iter().find(|p| !p.unlocked),
            Self::AnyParent => {
                let parents = graph.parents(id);
                if parents.iter().any(|p| p.unlocked) {
                    None
                } else {
                    parents.first().copied()
                }
            }
        }
    }

    /// Whether the prerequisites of `id` are met under this policy.
    ///
    /// Says nothing about whether `id` itself is already unlocked.
    pub fn prerequisites_met(&self, graph: &Graph, id: &str) -> bool {
        self.blocker(graph, id).is_none()
    }
}

/// Applies unlock transitions under one policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlocker {
    policy: UnlockPolicy,
}

impl Unlocker {
    pub const fn new(policy: UnlockPolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> UnlockPolicy {
        self.policy
    }

    /// Try to unlock one node.
    pub fn attempt(&self, graph: &mut Graph, id: &str) -> Result<UnlockOutcome> {
        let node = graph
            .get(id)
            .ok_or_else(|| UnlockError::NodeNotFound(id.to_string()))?;

        if node.unlocked {
            debug!("{} already unlocked", id);
            return Ok(UnlockOutcome::AlreadyUnlocked);
        }

        if let Some(parent) = self.policy.blocker(graph, id) {
            debug!("{} blocked by locked prerequisite {}", id, parent.id);
            return Err(UnlockError::PrerequisiteLocked {
                node: id.to_string(),
                parent: parent.id.clone(),
            });
        }

        graph.set_unlocked(id);
        debug!("Unlocked {}", id);
        Ok(UnlockOutcome::Unlocked)
    }
}

/// Try to unlock one node, gated by its first parent.
pub fn attempt_unlock(graph: &mut Graph, id: &str) -> Result<UnlockOutcome> {
    Unlocker::default().attempt(graph, id)
}

/// Current state of a node, `None` if it does not exist.
pub fn node_state(graph: &Graph, id: &str) -> Option<NodeState> {
    graph.get(id).map(|n| {
        if n.unlocked {
            NodeState::Unlocked
        } else {
            NodeState::Locked
        }
    })
}

/// Locked nodes that an attempt would unlock right now, in input order.
pub fn unlockable(graph: &Graph, policy: UnlockPolicy) -> Vec<&str> {
    graph
        .nodes()
        .iter()
        .filter(|n| !n.unlocked && policy.prerequisites_met(graph, &n.id))
        .map(|n| n.id.as_str())
        .collect()
}
