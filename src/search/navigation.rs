use std::time::{Duration, Instant};

use crate::models::{ChatEntry, SearchResult};
use crate::store::{MessageStore, StoreError};

/// The rendering surface's side of navigation.
///
/// Implementors bring the entry into view and emphasise it for a fixed time.
pub trait Navigator {
    fn scroll_to_and_emphasize(&mut self, index: usize);
}

/// Resolve a result back to its entry and hand the index to the navigator.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if the result points at an index the store
/// does not have; the navigator is not called in that case.
pub fn select_result<'s, N: Navigator + ?Sized>(
    store: &'s MessageStore,
    result: &SearchResult,
    navigator: &mut N,
) -> Result<&'s ChatEntry, StoreError> {
    let entry = store.get(result.source_index)?;
    navigator.scroll_to_and_emphasize(entry.sequence_index);
    Ok(entry)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmphasisId(u64);

/// One time-bounded emphasis on an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emphasis {
    pub id: EmphasisId,
    pub index: usize,
    pub expires_at: Instant,
}

/// Tracks emphasis states, each with its own expiry.
///
/// Selecting the same entry twice creates two independent states; expiring the
/// first leaves the second alone. Nothing stays emphasised past its deadline
/// once [`EmphasisTracker::expire`] has run.
#[derive(Debug)]
pub struct EmphasisTracker {
    duration: Duration,
    next_id: u64,
    active: Vec<Emphasis>,
}

impl EmphasisTracker {
    pub fn new(duration: Duration) -> Self {
        Self { duration, next_id: 0, active: Vec::new() }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn emphasize(&mut self, index: usize, now: Instant) -> EmphasisId {
        let id = EmphasisId(self.next_id);
        self.next_id += 1;
        self.active.push(Emphasis { id, index, expires_at: now + self.duration });
        id
    }

    /// Clear every emphasis whose time is up, returning the cleared ids
    pub fn expire(&mut self, now: Instant) -> Vec<EmphasisId> {
        let mut cleared = Vec::new();
        self.active.retain(|emphasis| {
            if now >= emphasis.expires_at {
                cleared.push(emphasis.id);
                false
            } else {
                true
            }
        });
        cleared
    }

    pub fn is_emphasized(&self, index: usize) -> bool {
        self.active.iter().any(|emphasis| emphasis.index == index)
    }

    pub fn active(&self) -> &[Emphasis] {
        &self.active
    }

    /// Earliest pending expiry, for sizing the event loop's poll timeout
    pub fn next_expiry(&self) -> Option<Instant> {
        self.active.iter().map(|emphasis| emphasis.expires_at).min()
    }
}
