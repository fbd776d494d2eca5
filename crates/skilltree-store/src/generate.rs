//! Topic-to-tree generation boundary.
//!
//! A [`SkillTreeGenerator`] turns a topic into raw JSON text, typically by
//! asking a language model. Nothing it returns is trusted: the text must pass
//! [`parse_generated`] before it becomes a node list, and any failure along
//! the way falls back to the default template.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use skilltree_graph::SkillNode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::record::decode_record;
use crate::templates::default_tree;

/// Why a generated tree was not used.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("topic is empty")]
    EmptyTopic,

    #[error("generator failed: {0}")]
    Backend(String),

    #[error("generator timed out after {0:?}")]
    Timeout(Duration),

    #[error("generator returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("generated tree rejected: {0}")]
    InvalidShape(String),
}

/// Produces skill-tree JSON for a topic.
#[async_trait]
pub trait SkillTreeGenerator: Send + Sync {
    /// Raw JSON text for `topic`, expected to be an array of nodes.
    async fn generate(&self, topic: &str) -> Result<String, GenerationFailure>;
}

/// Where a tree came from.
#[derive(Debug)]
pub enum TreeSource {
    Generated,
    Fallback(GenerationFailure),
}

/// Result of [`generate_or_fallback`].
#[derive(Debug)]
pub struct GeneratedTree {
    pub nodes: Vec<SkillNode>,
    pub source: TreeSource,
}

impl GeneratedTree {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, TreeSource::Fallback(_))
    }
}

/// The curriculum prompt for a topic.
pub fn prompt_for(topic: &str) -> String {
    format!(
        r#"You are a curriculum architect. Build a learning roadmap (a skill tree) for the topic: "{topic}".

Output rules:
1. Output MUST be a JSON array.
2. Every element has exactly this shape:
   {{ "id": "unique string", "label": "Skill name (at most 4 words)", "parents": ["parent node id"] }}
3. The first node is the root; its "parents" is the empty array [].
4. Every later node has a parent among the earlier nodes.
5. Produce at least 6 nodes, progressing from basic to advanced.

Example output (pure JSON):
[
  {{ "id": "step_1", "label": "Introduction", "parents": [] }},
  {{ "id": "step_2", "label": "Installing Tools", "parents": ["step_1"] }}
]"#
    )
}

/// Strip a surrounding markdown code fence, if any.
fn strip_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Validate generator output and turn it into a node list.
///
/// Accepts an array of nodes naming either their `children` or their
/// `parents`; both may be mixed. The result has unique ids, no dangling
/// references, exactly one root, and every node reachable from it. The root
/// comes back unlocked and every other node locked, whatever the generator
/// claimed.
pub fn parse_generated(text: &str) -> Result<Vec<SkillNode>, GenerationFailure> {
    let value: Value = serde_json::from_str(strip_fence(text))?;
    let items = value
        .as_array()
        .ok_or_else(|| GenerationFailure::InvalidShape("expected a JSON array".to_string()))?;
    if items.is_empty() {
        return Err(GenerationFailure::InvalidShape("no nodes".to_string()));
    }

    let mut nodes = Vec::with_capacity(items.len());
    let mut parents_of = Vec::with_capacity(items.len());
    let mut ids = HashSet::new();

    for (i, item) in items.iter().enumerate() {
        let node = decode_record(item)
            .map_err(|e| GenerationFailure::InvalidShape(format!("node {}: {}", i, e)))?;
        if !ids.insert(node.id.clone()) {
            return Err(GenerationFailure::InvalidShape(format!(
                "duplicate id {}",
                node.id
            )));
        }
        let parents: Vec<String> = item
            .get("parents")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        parents_of.push(parents);
        nodes.push(node);
    }

    // fold the parents shape into children
    for (i, parents) in parents_of.into_iter().enumerate() {
        let child = nodes[i].id.clone();
        for parent in parents {
            let Some(p) = nodes.iter_mut().find(|n| n.id == parent) else {
                return Err(GenerationFailure::InvalidShape(format!(
                    "{} names unknown parent {}",
                    child, parent
                )));
            };
            if !p.children.contains(&child) {
                p.children.push(child.clone());
            }
        }
    }

    let mut has_parent = HashSet::new();
    for node in &nodes {
        for child in &node.children {
            if !ids.contains(child) {
                return Err(GenerationFailure::InvalidShape(format!(
                    "{} names unknown child {}",
                    node.id, child
                )));
            }
            has_parent.insert(child.clone());
        }
    }

    let roots: Vec<usize> = (0..nodes.len())
        .filter(|&i| !has_parent.contains(&nodes[i].id))
        .collect();
    let [root] = roots[..] else {
        return Err(GenerationFailure::InvalidShape(format!(
            "expected one root, found {}",
            roots.len()
        )));
    };

    let unreachable = unreachable_from(&nodes, root);
    if !unreachable.is_empty() {
        return Err(GenerationFailure::InvalidShape(format!(
            "unreachable from root: {}",
            unreachable.join(", ")
        )));
    }

    for (i, node) in nodes.iter_mut().enumerate() {
        node.unlocked = i == root;
    }

    Ok(nodes)
}

/// Ids of nodes no chain of children leads to from `root`, in input order.
fn unreachable_from(nodes: &[SkillNode], root: usize) -> Vec<&str> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let mut seen = vec![false; nodes.len()];
    seen[root] = true;
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        for child in &nodes[i].children {
            if let Some(&c) = index.get(child.as_str()) {
                if !seen[c] {
                    seen[c] = true;
                    stack.push(c);
                }
            }
        }
    }
    nodes
        .iter()
        .zip(seen)
        .filter(|(_, seen)| !seen)
        .map(|(n, _)| n.id.as_str())
        .collect()
}

/// Generate a tree for `topic`, or fall back to the default template.
///
/// Never fails: every problem with the topic, the generator, or its output is
/// reported through [`TreeSource::Fallback`].
pub async fn generate_or_fallback(
    generator: &dyn SkillTreeGenerator,
    topic: &str,
    timeout: Duration,
) -> GeneratedTree {
    match try_generate(generator, topic, timeout).await {
        Ok(nodes) => {
            debug!("Generated {} nodes for {:?}", nodes.len(), topic);
            GeneratedTree {
                nodes,
                source: TreeSource::Generated,
            }
        }
        Err(reason) => {
            warn!("Using default tree for {:?}: {}", topic, reason);
            GeneratedTree {
                nodes: default_tree(),
                source: TreeSource::Fallback(reason),
            }
        }
    }
}

async fn try_generate(
    generator: &dyn SkillTreeGenerator,
    topic: &str,
    timeout: Duration,
) -> Result<Vec<SkillNode>, GenerationFailure> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(GenerationFailure::EmptyTopic);
    }

    let text = tokio::time::timeout(timeout, generator.generate(topic))
        .await
        .map_err(|_| GenerationFailure::Timeout(timeout))??;

    parse_generated(&text)
}
