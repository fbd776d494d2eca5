//! Progressive Unlock
//!
//! Each skill node is either `Locked` or `Unlocked`. Unlocked is terminal:
//! there is no way back.
//!
//! # Transition Rule
//!
//! [`attempt_unlock`] on a locked node succeeds when its governing parent is
//! unlocked, or when it has no parent at all (the root):
//!
//! - already unlocked → [`UnlockOutcome::AlreadyUnlocked`], nothing changes
//! - prerequisite met → [`UnlockOutcome::Unlocked`], exactly one flag flips
//! - prerequisite locked → [`UnlockError::PrerequisiteLocked`], nothing changes
//!
//! One call unlocks at most one node; nothing cascades to children. The
//! machine performs no I/O: persisting the flipped flag is the caller's job.
//!
//! # Multiple Parents
//!
//! Which parents gate a node is an [`UnlockPolicy`]. The default,
//! [`UnlockPolicy::FirstParent`], consults only the first parent in input
//! order. [`UnlockPolicy::AllParents`] and [`UnlockPolicy::AnyParent`] are
//! there for trees where that is not what the author meant.

mod error;
mod machine;
mod progress;

pub use error::{Result, UnlockError};
pub use machine::{
    attempt_unlock, node_state, unlockable, NodeState, UnlockOutcome, UnlockPolicy, Unlocker,
};
pub use progress::Progress;
