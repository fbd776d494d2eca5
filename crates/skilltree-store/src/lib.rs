//! Skill Tree Store - Persistence and Sessions
//!
//! Connects the skill tree engine to a per-user document store.
//!
//! # Architecture
//!
//! - **Records**: flat, position-free node records as stored on disk
//! - **Store**: the [`DocumentStore`] trait with in-memory and RocksDB backends
//! - **Generation**: topic → tree via a [`SkillTreeGenerator`], with a
//!   template fallback
//! - **Session**: [`TreeSession`] applies unlocks and writes them back
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use skilltree_store::{DocumentStore, MemoryStore, TaskKey, TreeSession};
//! use skilltree_layout::LayoutConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
//!     let mut session = TreeSession::open(store, TaskKey::new("user", "task")).await?;
//!     session.unlock("variables").await?;
//!     let layout = session.layout(&LayoutConfig::default())?;
//!     println!("{} nodes placed", layout.nodes.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod record;
pub mod session;
pub mod store;
pub mod task;
pub mod templates;

pub use config::SkillTreeConfig;
pub use error::{Error, Result};
pub use generate::{
    generate_or_fallback, parse_generated, prompt_for, GeneratedTree, GenerationFailure,
    SkillTreeGenerator, TreeSource,
};
pub use record::{decode_record, from_records, to_records, MalformedRecordError, SkillRecord};
pub use session::{create_task, TreeSession};
pub use store::{DocumentStore, MemoryStore, TaskListUpdate, TreeUpdate};
#[cfg(feature = "rocksdb")]
pub use store::RocksStore;
pub use task::{Task, TaskKey};
