//! Completion summary for a tree.

use skilltree_graph::Graph;

/// How much of a tree is unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub unlocked: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(graph: &Graph) -> Self {
        Self {
            unlocked: graph.nodes().iter().filter(|n| n.unlocked).count(),
            total: graph.len(),
        }
    }

    /// Unlocked share in `0.0..=1.0`; an empty tree counts as 0.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.unlocked as f64 / self.total as f64
        }
    }

    /// Every node unlocked (and there is at least one).
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.unlocked == self.total
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.unlocked, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skilltree_graph::{build_graph, SkillNode};

    #[test]
    fn counts_unlocked() {
        let graph = build_graph(vec![
            SkillNode::new("a", "A").with_children(["b"]).with_unlocked(true),
            SkillNode::new("b", "B"),
        ])
        .unwrap();
        let progress = Progress::of(&graph);

        assert_eq!(progress, Progress { unlocked: 1, total: 2 });
        assert_eq!(progress.fraction(), 0.5);
        assert!(!progress.is_complete());
        assert_eq!(progress.to_string(), "1/2");
    }

    #[test]
    fn empty_tree_is_not_complete() {
        let graph = build_graph(Vec::new()).unwrap();
        let progress = Progress::of(&graph);
        assert_eq!(progress.fraction(), 0.0);
        assert!(!progress.is_complete());
    }
}
