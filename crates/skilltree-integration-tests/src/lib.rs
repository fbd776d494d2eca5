//! Shared fixtures for the end-to-end tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use skilltree_graph::{build_graph, Graph};
use skilltree_store::{from_records, GenerationFailure, SkillTreeGenerator};

/// Build a graph from stored-record JSON, as a load from the store would.
pub fn graph_from(records: Value) -> skilltree_graph::Result<Graph> {
    let records = records.as_array().cloned().unwrap_or_default();
    build_graph(from_records(&records))
}

/// Root `a` with children `b` then `c`; only `a` unlocked.
pub fn abc() -> Value {
    json!([
        { "id": "a", "name": "A", "unlocked": true, "children": ["b", "c"] },
        { "id": "b", "name": "B", "unlocked": false, "children": [] },
        { "id": "c", "name": "C", "unlocked": false, "children": [] }
    ])
}

/// Generator that answers every topic with the same text.
pub struct StubGenerator {
    reply: Result<String, String>,
}

impl StubGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(reason.into()),
        }
    }
}

#[async_trait]
impl SkillTreeGenerator for StubGenerator {
    async fn generate(&self, _topic: &str) -> Result<String, GenerationFailure> {
        self.reply.clone().map_err(GenerationFailure::Backend)
    }
}
