//! Literal search over the chat history.
//!
//! # Pipeline
//!
//! - [`LiveSearch`] receives raw input on every keystroke and hands it to a
//!   [`Debouncer`], which keeps at most one scheduled search alive.
//! - When the quiet period passes, [`SearchEngine`] scans a snapshot of the
//!   store and builds [`SearchResult`](crate::models::SearchResult)s in append
//!   order.
//! - [`QueryMatcher`] treats the query as a literal, case-insensitive string
//!   for both containment and highlight spans.
//! - Selecting a result goes through [`select_result`], which resolves the
//!   index and calls the UI's [`Navigator`]. [`EmphasisTracker`] gives every
//!   selection its own expiring emphasis.
//!
//! Nothing here does I/O; the only "failure" is an empty result list.

pub mod debounce;
pub mod engine;
pub mod live;
pub mod matcher;
pub mod navigation;

pub use debounce::{Debouncer, TaskId};
pub use engine::{HistorySource, MIN_QUERY_CHARS, SearchEngine};
pub use live::{LiveSearch, SearchState};
pub use matcher::QueryMatcher;
pub use navigation::{Emphasis, EmphasisId, EmphasisTracker, Navigator, select_result};

/// Placeholder row shown when a search finds nothing
pub const NO_MATCHES_PLACEHOLDER: &str = "No quantum matches found";
/// Quiet period before a typed query is searched
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// How long a navigated-to entry stays emphasised
pub const DEFAULT_EMPHASIS_MS: u64 = 2000;
