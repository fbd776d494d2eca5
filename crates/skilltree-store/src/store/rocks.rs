//! Persistent document store using RocksDB.

use std::path::Path;

use async_trait::async_trait;
use rocksdb::{Options, DB};
use serde_json::Value;
use tokio::sync::broadcast;

use super::{DocumentStore, Subscribers, TaskListUpdate, TreeUpdate};
use crate::error::{Error, Result};
use crate::record::{to_values, SkillRecord};
use crate::task::{Task, TaskKey};

/// Document store backed by a local RocksDB database.
pub struct RocksStore {
    db: DB,
    subscribers: Subscribers<TaskKey, TreeUpdate>,
    task_subscribers: Subscribers<String, TaskListUpdate>,
}

impl RocksStore {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self {
            db,
            subscribers: Subscribers::default(),
            task_subscribers: Subscribers::default(),
        })
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

fn task_key(key: &TaskKey) -> String {
    format!("task:{}:{}", key.user_id, key.task_id)
}

fn tree_key(key: &TaskKey) -> String {
    format!("tree:{}:{}", key.user_id, key.task_id)
}

#[async_trait]
impl DocumentStore for RocksStore {
    async fn get_tree(&self, key: &TaskKey) -> Result<Option<Vec<Value>>> {
        match self.db.get(tree_key(key).as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn set_tree(&self, key: &TaskKey, records: &[SkillRecord]) -> Result<()> {
        let values = to_values(records)?;
        let data = serde_json::to_vec(&values)?;
        self.db.put(tree_key(key).as_bytes(), data)?;
        let update = TreeUpdate {
            key: key.clone(),
            records: values,
        };
        self.subscribers.publish(key, update);
        Ok(())
    }

    fn subscribe(&self, key: &TaskKey) -> broadcast::Receiver<TreeUpdate> {
        self.subscribers.subscribe(key.clone())
    }

    fn subscribe_tasks(&self, user_id: &str) -> broadcast::Receiver<TaskListUpdate> {
        self.task_subscribers.subscribe(user_id.to_string())
    }

    async fn put_task(&self, user_id: &str, task: &Task) -> Result<()> {
        let key = task_key(&TaskKey::new(user_id, task.id.as_str()));
        let value = serde_json::to_vec(task)?;
        self.db.put(key.as_bytes(), value)?;
        self.publish_tasks(user_id).await
    }

    async fn get_task(&self, key: &TaskKey) -> Result<Option<Task>> {
        match self.db.get(task_key(key).as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let prefix = format!("task:{}:", user_id);
        let prefix = prefix.as_bytes();
        let mut tasks = Vec::new();

        for item in self.db.prefix_iterator(prefix) {
            let (key, value) = item?;
            let Some(task_id) = key.strip_prefix(prefix) else {
                break;
            };
            // A longer user id sharing this prefix, like "u1:x" under "u1"
            if task_id.contains(&b':') {
                continue;
            }
            let task: Task = serde_json::from_slice(&value)?;
            tasks.push(task);
        }

        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn set_task_completed(&self, key: &TaskKey, completed: bool) -> Result<()> {
        let mut task = self
            .get_task(key)
            .await?
            .ok_or_else(|| Error::NotFound(format!("task {}", key)))?;
        task.completed = completed;
        self.put_task(&key.user_id, &task).await
    }

    async fn delete_task(&self, key: &TaskKey) -> Result<()> {
        self.db.delete(task_key(key).as_bytes())?;
        self.db.delete(tree_key(key).as_bytes())?;
        self.subscribers.forget(key);
        self.publish_tasks(&key.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn task(id: &str, created_at: u64) -> Task {
        Task {
            id: id.to_string(),
            name: format!("topic {}", id),
            completed: false,
            created_at,
        }
    }

    #[tokio::test]
    async fn task_roundtrip() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        store.put_task("u1", &task("t1", 1)).await.unwrap();
        let key = TaskKey::new("u1", "t1");
        let loaded = store.get_task(&key).await.unwrap().unwrap();
        assert_eq!(loaded.name, "topic t1");

        store.set_task_completed(&key, true).await.unwrap();
        assert!(store.get_task(&key).await.unwrap().unwrap().completed);
    }

    #[tokio::test]
    async fn list_tasks_per_user() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        store.put_task("u1", &task("b", 2)).await.unwrap();
        store.put_task("u1", &task("a", 1)).await.unwrap();
        store.put_task("u2", &task("c", 0)).await.unwrap();

        let ids: Vec<_> = store
            .list_tasks("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn user_ids_sharing_a_prefix_stay_apart() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        store.put_task("u1", &task("mine", 1)).await.unwrap();
        store.put_task("u1:x", &task("theirs", 2)).await.unwrap();

        let ids: Vec<_> = store
            .list_tasks("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["mine"]);

        let ids: Vec<_> = store
            .list_tasks("u1:x")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["theirs"]);
    }

    #[tokio::test]
    async fn task_list_subscribers_see_changes() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        let mut rx = store.subscribe_tasks("u1");

        store.put_task("u1", &task("t1", 1)).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().tasks, vec![task("t1", 1)]);

        store.delete_task(&TaskKey::new("u1", "t1")).await.unwrap();
        assert!(rx.recv().await.unwrap().tasks.is_empty());
    }

    #[tokio::test]
    async fn tree_survives_reopen() {
        let dir = tempdir().unwrap();
        let key = TaskKey::new("u1", "t1");
        let records = vec![SkillRecord {
            id: "a".into(),
            name: "A".into(),
            unlocked: true,
            children: vec![],
            icon: None,
        }];

        {
            let store = RocksStore::open(dir.path()).unwrap();
            store.set_tree(&key, &records).await.unwrap();
        }

        let store = RocksStore::open(dir.path()).unwrap();
        let stored = store.get_tree(&key).await.unwrap().unwrap();
        assert_eq!(stored[0]["id"], "a");

        store.delete_task(&key).await.unwrap();
        assert!(store.get_tree(&key).await.unwrap().is_none());
    }
}
