//! In-memory document store for tests and offline use.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use super::{DocumentStore, Subscribers, TaskListUpdate, TreeUpdate};
use crate::error::{Error, Result};
use crate::record::{to_values, SkillRecord};
use crate::task::{Task, TaskKey};

/// Document store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<BTreeMap<TaskKey, Task>>,
    trees: RwLock<HashMap<TaskKey, Vec<Value>>>,
    subscribers: Subscribers<TaskKey, TreeUpdate>,
    task_subscribers: Subscribers<String, TaskListUpdate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw records as-is, bypassing the typed write path.
    ///
    /// Lets callers seed trees that a well-behaved writer would never
    /// produce, such as ones holding malformed records.
    pub async fn put_raw_tree(&self, key: &TaskKey, records: Vec<Value>) {
        self.trees.write().await.insert(key.clone(), records.clone());
        self.publish_tree(key, records);
    }

    /// Number of stored trees.
    pub async fn tree_count(&self) -> usize {
        self.trees.read().await.len()
    }

    fn publish_tree(&self, key: &TaskKey, records: Vec<Value>) {
        let update = TreeUpdate {
            key: key.clone(),
            records,
        };
        self.subscribers.publish(key, update);
    }

    async fn publish_tasks(&self, user_id: &str) -> Result<()> {
        if self.task_subscribers.is_watched(user_id) {
            let tasks = self.list_tasks(user_id).await?;
            let update = TaskListUpdate {
                user_id: user_id.to_string(),
                tasks,
            };
            self.task_subscribers.publish(user_id, update);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_tree(&self, key: &TaskKey) -> Result<Option<Vec<Value>>> {
        Ok(self.trees.read().await.get(key).cloned())
    }

    async fn set_tree(&self, key: &TaskKey, records: &[SkillRecord]) -> Result<()> {
        let values = to_values(records)?;
        self.trees.write().await.insert(key.clone(), values.clone());
        self.publish_tree(key, values);
        Ok(())
    }

    fn subscribe(&self, key: &TaskKey) -> broadcast::Receiver<TreeUpdate> {
        self.subscribers.subscribe(key.clone())
    }

    fn subscribe_tasks(&self, user_id: &str) -> broadcast::Receiver<TaskListUpdate> {
        self.task_subscribers.subscribe(user_id.to_string())
    }

    async fn put_task(&self, user_id: &str, task: &Task) -> Result<()> {
        let key = TaskKey::new(user_id, task.id.as_str());
        self.tasks.write().await.insert(key, task.clone());
        self.publish_tasks(user_id).await
    }

    async fn get_task(&self, key: &TaskKey) -> Result<Option<Task>> {
        Ok(self.tasks.read().await.get(key).cloned())
    }

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut list: Vec<Task> = tasks
            .iter()
            .filter(|(key, _)| key.user_id == user_id)
            .map(|(_, task)| task.clone())
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn set_task_completed(&self, key: &TaskKey, completed: bool) -> Result<()> {
        {
            let mut tasks = self.tasks.write().await;
            let task = tasks
                .get_mut(key)
                .ok_or_else(|| Error::NotFound(format!("task {}", key)))?;
            task.completed = completed;
        }
        self.publish_tasks(&key.user_id).await
    }

    async fn delete_task(&self, key: &TaskKey) -> Result<()> {
        self.tasks.write().await.remove(key);
        self.trees.write().await.remove(key);
        self.subscribers.forget(key);
        self.publish_tasks(&key.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, unlocked: bool, children: &[&str]) -> SkillRecord {
        SkillRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            unlocked,
            children: children.iter().map(|c| c.to_string()).collect(),
            icon: None,
        }
    }

    fn task(id: &str, created_at: u64) -> Task {
        Task {
            id: id.to_string(),
            name: format!("topic {}", id),
            completed: false,
            created_at,
        }
    }

    #[tokio::test]
    async fn tree_roundtrip() {
        let store = MemoryStore::new();
        let key = TaskKey::new("u1", "t1");

        assert!(store.get_tree(&key).await.unwrap().is_none());

        store
            .set_tree(&key, &[record("a", true, &["b"]), record("b", false, &[])])
            .await
            .unwrap();

        let stored = store.get_tree(&key).await.unwrap().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0]["children"], json!(["b"]));
        assert_eq!(store.tree_count().await, 1);
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = MemoryStore::new();
        let key = TaskKey::new("u1", "t1");

        store.set_tree(&key, &[record("a", false, &[])]).await.unwrap();
        store.set_tree(&key, &[record("a", true, &[])]).await.unwrap();

        let stored = store.get_tree(&key).await.unwrap().unwrap();
        assert_eq!(stored[0]["unlocked"], json!(true));
    }

    #[tokio::test]
    async fn trees_scoped_per_user() {
        let store = MemoryStore::new();
        store
            .set_tree(&TaskKey::new("u1", "t"), &[record("a", true, &[])])
            .await
            .unwrap();

        assert!(store
            .get_tree(&TaskKey::new("u2", "t"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn subscribers_see_writes() {
        let store = MemoryStore::new();
        let key = TaskKey::new("u1", "t1");
        let mut rx = store.subscribe(&key);

        store.set_tree(&key, &[record("a", true, &[])]).await.unwrap();
        store
            .set_tree(&TaskKey::new("u1", "other"), &[record("z", true, &[])])
            .await
            .unwrap();

        let update = rx.recv().await.unwrap();
        assert_eq!(update.key, key);
        assert_eq!(update.records[0]["id"], json!("a"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn task_crud() {
        let store = MemoryStore::new();
        store.put_task("u1", &task("late", 20)).await.unwrap();
        store.put_task("u1", &task("early", 10)).await.unwrap();
        store.put_task("u2", &task("other", 5)).await.unwrap();

        let ids: Vec<_> = store
            .list_tasks("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["early", "late"]);

        let key = TaskKey::new("u1", "early");
        store.set_task_completed(&key, true).await.unwrap();
        assert!(store.get_task(&key).await.unwrap().unwrap().completed);

        store.set_tree(&key, &[record("a", true, &[])]).await.unwrap();
        store.delete_task(&key).await.unwrap();
        assert!(store.get_task(&key).await.unwrap().is_none());
        assert!(store.get_tree(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn task_list_subscribers_see_changes() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe_tasks("u1");

        store.put_task("u1", &task("t1", 10)).await.unwrap();
        let update = rx.recv().await.unwrap();
        assert_eq!(update.user_id, "u1");
        assert_eq!(update.tasks, vec![task("t1", 10)]);

        // other users' tasks stay off this channel
        store.put_task("u2", &task("x", 1)).await.unwrap();
        assert!(rx.try_recv().is_err());

        let key = TaskKey::new("u1", "t1");
        store.set_task_completed(&key, true).await.unwrap();
        assert!(rx.recv().await.unwrap().tasks[0].completed);

        store.delete_task(&key).await.unwrap();
        assert!(rx.recv().await.unwrap().tasks.is_empty());
    }

    #[tokio::test]
    async fn failed_completion_publishes_nothing() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe_tasks("u1");
        assert!(store
            .set_task_completed(&TaskKey::new("u1", "ghost"), true)
            .await
            .is_err());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn complete_missing_task() {
        let store = MemoryStore::new();
        let result = store
            .set_task_completed(&TaskKey::new("u1", "ghost"), true)
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn raw_trees_kept_verbatim() {
        let store = MemoryStore::new();
        let key = TaskKey::new("u1", "t1");
        store
            .put_raw_tree(&key, vec![json!("junk"), json!({ "id": "a" })])
            .await;

        let stored = store.get_tree(&key).await.unwrap().unwrap();
        assert_eq!(stored[0], json!("junk"));
    }
}
