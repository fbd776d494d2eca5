//! Post-order placement.

use skilltree_graph::{Graph, Position, SkillNode};

use crate::bounds::Bounds;
use crate::config::LayoutConfig;
use crate::error::Result;

/// A connector between two positioned nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
    /// Whether the child end is unlocked (drawn highlighted)
    pub active: bool,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    /// Root the pass started from
    pub root: Option<String>,
    /// Reachable nodes in pre-order, each with `position` set
    pub nodes: Vec<SkillNode>,
    /// Every graph edge whose endpoints are both positioned
    pub edges: Vec<LayoutEdge>,
    pub bounds: Bounds,
}

impl Layout {
    /// Position of a node, if it was placed.
    pub fn position(&self, id: &str) -> Option<Position> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .and_then(|n| n.position)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnPath,
    Placed,
}

struct Placer<'g> {
    graph: &'g Graph,
    pitch: f64,
    level_gap: f64,
    visits: Vec<Option<Visit>>,
    positions: Vec<Option<Position>>,
    /// Children each node was placed over, for pre-order flattening
    placed_under: Vec<Vec<usize>>,
    cursor: f64,
}

impl<'g> Placer<'g> {
    fn new(graph: &'g Graph, config: &LayoutConfig) -> Self {
        let n = graph.len();
        Self {
            graph,
            pitch: config.leaf_pitch(),
            level_gap: config.level_gap,
            visits: vec![None; n],
            positions: vec![None; n],
            placed_under: vec![Vec::new(); n],
            cursor: 0.0,
        }
    }

    /// Post-order placement from `root`, one frame per node on the current path.
    fn place(&mut self, root: usize) {
        let graph = self.graph;
        self.visits[root] = Some(Visit::OnPath);
        // (node, depth, next child to look at)
        let mut stack = vec![(root, 0usize, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (i, depth, next) = *frame;
            if let Some(child) = graph.nodes()[i].children.get(next) {
                frame.2 += 1;
                let Some(c) = graph.position_of(child) else {
                    continue;
                };
                // Already placed elsewhere, or a cycle back onto the path
                if self.visits[c].is_some() {
                    continue;
                }
                self.visits[c] = Some(Visit::OnPath);
                self.placed_under[i].push(c);
                stack.push((c, depth + 1, 0));
                continue;
            }

            stack.pop();
            let placed = &self.placed_under[i];
            let x = match (placed.first().copied(), placed.last().copied()) {
                (Some(first), Some(last)) => (self.x_of(first) + self.x_of(last)) / 2.0,
                _ => {
                    let x = self.cursor;
                    self.cursor += self.pitch;
                    x
                }
            };
            self.positions[i] = Some(Position::new(x, depth as f64 * self.level_gap));
            self.visits[i] = Some(Visit::Placed);
        }
    }

    fn x_of(&self, i: usize) -> f64 {
        self.positions[i].map(|p| p.x).unwrap_or_default()
    }

    /// Pre-order over the placement tree.
    fn flatten(&self, root: usize) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.graph.len());
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(self.placed_under[i].iter().rev());
        }
        order
    }
}

/// Lay out every node reachable from the root.
///
/// `root` designates the start node; when it is `None` the graph's own root
/// is used, and when it names a missing node the first node in input order
/// is used.
pub fn layout(graph: &Graph, root: Option<&str>, config: &LayoutConfig) -> Result<Layout> {
    config.validate()?;

    let start = match root {
        Some(id) => graph.position_of(id).or(if graph.is_empty() { None } else { Some(0) }),
        None => graph.root_id().and_then(|id| graph.position_of(id)),
    };
    let Some(start) = start else {
        return Ok(Layout::default());
    };

    let mut placer = Placer::new(graph, config);
    placer.place(start);

    let order = placer.flatten(start);
    let mut nodes = Vec::with_capacity(order.len());
    for &i in &order {
        let mut node = graph.nodes()[i].clone();
        node.position = placer.positions[i];
        nodes.push(node);
    }

    let positions = &placer.positions;
    let edges = nodes
        .iter()
        .flat_map(|parent| {
            parent.children.iter().filter_map(move |child| {
                let c = graph.position_of(child)?;
                positions[c]?;
                Some(LayoutEdge {
                    from: parent.id.clone(),
                    to: child.clone(),
                    active: graph.nodes()[c].unlocked,
                })
            })
        })
        .collect();

    let bounds = Bounds::of(nodes.iter().filter_map(|n| n.position));

    Ok(Layout {
        root: Some(graph.nodes()[start].id.clone()),
        nodes,
        edges,
        bounds,
    })
}
