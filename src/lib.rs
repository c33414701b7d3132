//! Quantum Chat - a terminal chat with searchable history
//!
//! The core is an append-only [`MessageStore`] of chat entries and a
//! [`SearchEngine`] over it:
//!
//! - Every entry keeps its raw content plus a plain-text projection derived
//!   from the same markup blocks the UI renders
//! - Search is a case-insensitive literal substring match on that projection,
//!   with highlight spans for each hit
//! - Live search in the UI is debounced, and picking a result scrolls to the
//!   entry and emphasises it for a short time
//!
//! Around the core sit the assistant [`Responder`] (a static AMOS knowledge
//! base), reactions, JSONL transcripts, and the ratatui front end.
//!
//! # Example
//!
//! ```
//! use quantum_chat::{MessageStore, Role, SearchEngine};
//!
//! let mut store = MessageStore::new();
//! store.append(Role::User, "Hello there")?;
//! store.append(Role::Assistant, "General Kenobi")?;
//! store.append(Role::User, "THERE it is")?;
//!
//! let results = SearchEngine::new().search(&store, "there");
//! let indices: Vec<usize> = results.iter().map(|r| r.source_index).collect();
//! assert_eq!(indices, vec![0, 2]);
//! # Ok::<(), quantum_chat::StoreError>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod logging;
pub mod markup;
pub mod models;
pub mod responder;
pub mod search;
pub mod store;
pub mod transcript;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use config::UserConfig;
pub use models::{ChatEntry, Reaction, Role, SearchResult, Snippet};
pub use responder::{KnowledgeBase, Responder};
pub use search::{LiveSearch, SearchEngine};
pub use store::{MessageStore, ReactionBoard, StoreError};
pub use transcript::{load_transcript, save_transcript};
