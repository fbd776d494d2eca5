//! One task's tree, loaded and kept in step with the store.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use skilltree_graph::{build_graph, Graph};
use skilltree_layout::{layout, Layout, LayoutConfig};
use skilltree_unlock::{unlockable, Progress, UnlockOutcome, UnlockPolicy, Unlocker};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::generate::{generate_or_fallback, SkillTreeGenerator, TreeSource};
use crate::record::{from_records, to_records};
use crate::store::{DocumentStore, TreeUpdate};
use crate::task::{Task, TaskKey};

/// An open skill tree backed by a document store.
///
/// Unlocks go through the session so that every flipped flag is written
/// back. A failed write keeps the unlock in memory and leaves the session
/// unsaved until [`TreeSession::save`] succeeds.
pub struct TreeSession {
    store: Arc<dyn DocumentStore>,
    key: TaskKey,
    graph: Graph,
    unlocker: Unlocker,
    saved: bool,
}

impl TreeSession {
    /// Load a task's tree. `NotFound` if no tree is stored.
    pub async fn open(store: Arc<dyn DocumentStore>, key: TaskKey) -> Result<Self> {
        let records = store
            .get_tree(&key)
            .await?
            .ok_or_else(|| Error::NotFound(format!("tree {}", key)))?;
        let graph = build_graph(from_records(&records))?;
        debug!("Opened {} with {} nodes", key, graph.len());

        Ok(Self {
            store,
            key,
            graph,
            unlocker: Unlocker::default(),
            saved: true,
        })
    }

    /// Wrap a graph that has not been written yet.
    pub fn from_graph(store: Arc<dyn DocumentStore>, key: TaskKey, graph: Graph) -> Self {
        Self {
            store,
            key,
            graph,
            unlocker: Unlocker::default(),
            saved: false,
        }
    }

    pub fn with_policy(mut self, policy: UnlockPolicy) -> Self {
        self.unlocker = Unlocker::new(policy);
        self
    }

    pub fn key(&self) -> &TaskKey {
        &self.key
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn policy(&self) -> UnlockPolicy {
        self.unlocker.policy()
    }

    /// Whether the store holds the current in-memory tree.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn layout(&self, config: &LayoutConfig) -> Result<Layout> {
        Ok(layout(&self.graph, None, config)?)
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.graph)
    }

    /// Nodes an unlock attempt would succeed on right now.
    pub fn unlockable(&self) -> Vec<&str> {
        unlockable(&self.graph, self.unlocker.policy())
    }

    /// Unlock one node and write the tree back.
    ///
    /// Rule violations leave everything untouched. If the node flips but the
    /// write fails, the unlock stays applied in memory and
    /// [`Error::PersistenceWrite`] is returned.
    pub async fn unlock(&mut self, id: &str) -> Result<UnlockOutcome> {
        let outcome = self.unlocker.attempt(&mut self.graph, id)?;

        if outcome == UnlockOutcome::Unlocked {
            self.saved = false;
            if let Err(e) = self.write().await {
                warn!("Unlock of {} in {} not saved: {}", id, self.key, e);
                return Err(Error::PersistenceWrite {
                    node: id.to_string(),
                    source: Box::new(e),
                });
            }
        }

        Ok(outcome)
    }

    /// Write pending changes, if any.
    pub async fn save(&mut self) -> Result<()> {
        if self.saved {
            return Ok(());
        }
        self.write().await
    }

    /// Updates written to this tree by anyone, this session included.
    pub fn subscribe(&self) -> broadcast::Receiver<TreeUpdate> {
        self.store.subscribe(&self.key)
    }

    /// Replace the tree with one written elsewhere.
    ///
    /// The last write wins. Returns `true` when unsaved local unlocks were
    /// discarded in the process.
    pub fn apply_remote(&mut self, records: &[Value]) -> Result<bool> {
        let graph = build_graph(from_records(records))?;
        let discarded = !self.saved;
        if discarded {
            warn!("Remote write to {} replaces unsaved unlocks", self.key);
        }

        self.graph = graph;
        self.saved = true;
        Ok(discarded)
    }

    async fn write(&mut self) -> Result<()> {
        self.store.set_tree(&self.key, &to_records(&self.graph)).await?;
        self.saved = true;
        debug!("Saved {}", self.key);
        Ok(())
    }
}

/// Create a task for `topic` along with its tree.
///
/// The tree comes from `generator`, or from the default template when the
/// generator fails in any way. Only a blank topic is an error.
///
/// The tree is written before the task, so a listed task always has a
/// tree. If the task write fails the tree is removed again.
pub async fn create_task(
    store: &dyn DocumentStore,
    generator: &dyn SkillTreeGenerator,
    user_id: &str,
    topic: &str,
    timeout: Duration,
) -> Result<Task> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(Error::InvalidInput("topic must not be empty".to_string()));
    }

    let tree = generate_or_fallback(generator, topic, timeout).await;
    let graph = build_graph(tree.nodes)?;

    let task = Task::new(user_id, topic.to_string());
    let key = TaskKey::new(user_id, task.id.as_str());
    store.set_tree(&key, &to_records(&graph)).await?;
    if let Err(e) = store.put_task(user_id, &task).await {
        if let Err(cleanup) = store.delete_task(&key).await {
            warn!("Failed to remove tree of unsaved task {}: {}", key, cleanup);
        }
        return Err(e);
    }

    match tree.source {
        TreeSource::Generated => info!("Created task {} with a generated tree", key),
        TreeSource::Fallback(reason) => {
            info!("Created task {} with the default tree ({})", key, reason)
        }
    }

    Ok(task)
}
