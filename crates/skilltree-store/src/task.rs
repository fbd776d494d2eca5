//! Task model: one topic a user is learning, owning one skill tree.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A learning task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier within the user's tasks
    pub id: String,

    /// The topic as the user typed it
    pub name: String,

    /// Marked done by the user
    #[serde(default)]
    pub completed: bool,

    /// Creation time, unix milliseconds
    pub created_at: u64,
}

impl Task {
    /// Create a new task for `user_id`, stamped now.
    pub fn new(user_id: &str, name: String) -> Self {
        let created_at = now_millis();
        Self {
            id: Self::generate_id(user_id, &name, created_at),
            name,
            completed: false,
            created_at,
        }
    }

    /// Generate an id from the owner, topic, and creation time.
    pub fn generate_id(user_id: &str, name: &str, created_at: u64) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(user_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(name.as_bytes());
        hasher.update(&created_at.to_le_bytes());
        hex::encode(&hasher.finalize().as_bytes()[..10])
    }
}

/// Identifies one task's documents: scoped per user, then per task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskKey {
    pub user_id: String,
    pub task_id: String,
}

impl TaskKey {
    pub fn new(user_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            task_id: task_id.into(),
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.task_id)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task() {
        let task = Task::new("user1", "Learn Rust".to_string());
        assert_eq!(task.name, "Learn Rust");
        assert!(!task.completed);
        assert_eq!(task.id.len(), 20);
    }

    #[test]
    fn generate_id_deterministic() {
        let id1 = Task::generate_id("u", "topic", 42);
        let id2 = Task::generate_id("u", "topic", 42);
        assert_eq!(id1, id2);
        assert_ne!(id1, Task::generate_id("u", "topic", 43));
        assert_ne!(id1, Task::generate_id("v", "topic", 42));
    }

    #[test]
    fn serialize_deserialize() {
        let task = Task {
            id: "t1".to_string(),
            name: "Python".to_string(),
            completed: true,
            created_at: 1_700_000_000_000,
        };

        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(task, parsed);
    }

    #[test]
    fn key_display() {
        assert_eq!(TaskKey::new("u", "t").to_string(), "u/t");
    }
}
