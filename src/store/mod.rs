//! Chat history storage.
//!
//! [`MessageStore`] is the append-only source of truth that search runs
//! against. Indices handed out by [`MessageStore::append`] are dense, start at
//! zero and are never reused, so anything holding an index (search results,
//! reactions, the UI's scroll target) stays valid for the whole session.
//!
//! Reactions are kept beside the store in a [`ReactionBoard`] instead of on
//! the entries themselves.

pub mod error;
pub mod message_store;
pub mod reactions;

pub use error::StoreError;
pub use message_store::{MessageStore, Snapshot};
pub use reactions::ReactionBoard;
