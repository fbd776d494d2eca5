//! Document store boundary.
//!
//! The remote document store is reached only through [`DocumentStore`], a
//! handle constructed by the caller and passed to whoever needs it. Writes
//! are last-write-wins; there is no merge of concurrent edits.

mod memory;
#[cfg(feature = "rocksdb")]
mod rocks;

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::record::SkillRecord;
use crate::task::{Task, TaskKey};

pub use memory::MemoryStore;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksStore;

/// Buffered updates per subscribed tree or task list before slow receivers lag.
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// A tree written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeUpdate {
    pub key: TaskKey,
    /// Stored records, to be read with `from_records`
    pub records: Vec<Value>,
}

/// A user's full task list after one of their tasks was written or deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskListUpdate {
    pub user_id: String,
    /// Oldest first, as [`DocumentStore::list_tasks`] returns them
    pub tasks: Vec<Task>,
}

/// Key-value document store scoped per user and per task.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stored records of a task's tree, if any.
    ///
    /// Records come back raw; malformed ones are filtered when decoded.
    async fn get_tree(&self, key: &TaskKey) -> Result<Option<Vec<Value>>>;

    /// Replace a task's tree and notify subscribers.
    async fn set_tree(&self, key: &TaskKey, records: &[SkillRecord]) -> Result<()>;

    /// Receive every tree written to `key` from now on.
    fn subscribe(&self, key: &TaskKey) -> broadcast::Receiver<TreeUpdate>;

    /// Receive `user_id`'s task list every time one of their tasks changes.
    fn subscribe_tasks(&self, user_id: &str) -> broadcast::Receiver<TaskListUpdate>;

    /// Insert or replace a task.
    async fn put_task(&self, user_id: &str, task: &Task) -> Result<()>;

    /// Get a task by key.
    async fn get_task(&self, key: &TaskKey) -> Result<Option<Task>>;

    /// All tasks of a user, oldest first.
    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>>;

    /// Set a task's completed flag. `NotFound` if the task is missing.
    async fn set_task_completed(&self, key: &TaskKey, completed: bool) -> Result<()>;

    /// Delete a task together with its tree.
    async fn delete_task(&self, key: &TaskKey) -> Result<()>;
}

/// Fan-out of store writes to subscribers, shared by the backends.
///
/// Keyed by task for tree updates and by user for task lists.
#[derive(Debug)]
pub(crate) struct Subscribers<K, T> {
    channels: Mutex<HashMap<K, broadcast::Sender<T>>>,
}

impl<K, T> Default for Subscribers<K, T> {
    fn default() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, T: Clone> Subscribers<K, T> {
    pub(crate) fn subscribe(&self, key: K) -> broadcast::Receiver<T> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        // Drop channels whose receivers all went away without a later write
        channels.retain(|_, tx| tx.receiver_count() > 0);
        channels
            .entry(key)
            .or_insert_with(|| broadcast::channel(UPDATE_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Whether anyone is listening on `key`.
    pub(crate) fn is_watched<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|tx| tx.receiver_count() > 0)
    }

    pub(crate) fn publish<Q>(&self, key: &Q, update: T)
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = channels.get(key) {
            if tx.send(update).is_err() {
                // every receiver is gone
                channels.remove(key);
            }
        }
    }

    pub(crate) fn forget<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    #[cfg(test)]
    fn channel_count(&self) -> usize {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
