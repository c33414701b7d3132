use thiserror::Error;

/// Failures of the message store. Neither is fatal; callers decide what to show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Content was empty or whitespace-only
    #[error("entry content is empty")]
    InvalidEntry,
    /// No entry has this sequence index
    #[error("no entry at index {0}")]
    NotFound(usize),
}
