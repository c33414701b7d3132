//! Data models for the chat session.
//!
//! - [`ChatEntry`] - One stored chat turn with its plain-text projection
//! - [`SearchResult`] - A search hit pointing back at an entry by index
//! - [`Snippet`] - Plain text plus highlighted match spans
//! - [`Reaction`] - Badges attached to entries through a side mapping

pub mod chat;
pub mod reaction;
pub mod search;

pub use chat::{ChatEntry, Role};
pub use reaction::Reaction;
pub use search::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN, SearchResult, Snippet, SnippetSegment};
