use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::StoreError;
use crate::markup::plain_text;
use crate::models::{ChatEntry, Role};

/// Append-only ordered chat history.
///
/// Entries live in a shared vector. A [`Snapshot`] holds its own reference to
/// that vector; appending while a snapshot is alive copies the vector first,
/// so a snapshot never observes later (or half-finished) appends.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    entries: Arc<Vec<ChatEntry>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn stamped with the current time
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntry`] if `content` is empty after trimming.
    /// The store is unchanged in that case.
    pub fn append(&mut self, role: Role, content: &str) -> Result<usize, StoreError> {
        self.append_at(role, content, Utc::now())
    }

    /// Append a turn with an explicit timestamp (used when restoring a transcript)
    ///
    /// Only the raw content is checked: a turn made entirely of markup (say
    /// `<br>`) is stored with an empty `plain_text` and never matches a search.
    pub fn append_at(
        &mut self,
        role: Role,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::InvalidEntry);
        }

        let sequence_index = self.entries.len();
        let entry = ChatEntry {
            sequence_index,
            role,
            content: content.to_string(),
            plain_text: plain_text(content),
            timestamp,
        };
        Arc::make_mut(&mut self.entries).push(entry);

        tracing::debug!(index = sequence_index, ?role, "appended chat entry");
        Ok(sequence_index)
    }

    /// Snapshot of every entry at call time, in append order
    pub fn all(&self) -> Snapshot {
        Snapshot { entries: Arc::clone(&self.entries) }
    }

    pub fn get(&self, sequence_index: usize) -> Result<&ChatEntry, StoreError> {
        self.entries.get(sequence_index).ok_or(StoreError::NotFound(sequence_index))
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable view of the store taken by [`MessageStore::all`].
///
/// Cheap to clone and can be iterated any number of times.
#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Arc<Vec<ChatEntry>>,
}

impl Snapshot {
    pub fn iter(&self) -> std::slice::Iter<'_, ChatEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a ChatEntry;
    type IntoIter = std::slice::Iter<'a, ChatEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_append_returns_dense_indices() {
        let mut store = MessageStore::new();
        assert_eq!(store.append(Role::User, "first").unwrap(), 0);
        assert_eq!(store.append(Role::Assistant, "second").unwrap(), 1);
        assert_eq!(store.append(Role::User, "third").unwrap(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_append_then_get_round_trips() {
        let mut store = MessageStore::new();
        let idx = store.append(Role::Assistant, "Hello <b>there</b>").unwrap();

        let entry = store.get(idx).unwrap();
        assert_eq!(entry.role, Role::Assistant);
        assert_eq!(entry.content, "Hello <b>there</b>");
        assert_eq!(entry.plain_text, "Hello there");
        assert_eq!(entry.sequence_index, idx);
    }

    #[test]
    fn test_append_rejects_blank_content() {
        let mut store = MessageStore::new();
        assert_eq!(store.append(Role::User, ""), Err(StoreError::InvalidEntry));
        assert_eq!(store.append(Role::User, "  \n\t "), Err(StoreError::InvalidEntry));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_append_does_not_consume_index() {
        let mut store = MessageStore::new();
        store.append(Role::User, "a").unwrap();
        let _ = store.append(Role::User, "   ");
        assert_eq!(store.append(Role::User, "b").unwrap(), 1);
    }

    #[test]
    fn test_get_missing_index() {
        let mut store = MessageStore::new();
        store.append(Role::User, "only one").unwrap();
        assert_eq!(store.get(1), Err(StoreError::NotFound(1)));
        assert_eq!(store.get(usize::MAX), Err(StoreError::NotFound(usize::MAX)));
    }

    #[test]
    fn test_snapshot_ignores_later_appends() {
        let mut store = MessageStore::new();
        store.append(Role::User, "one").unwrap();
        store.append(Role::Assistant, "two").unwrap();

        let snapshot = store.all();
        let mut seen = Vec::new();
        for entry in &snapshot {
            seen.push(entry.content.clone());
            // Appending mid-iteration must not leak into the snapshot
            store.append(Role::User, "late").unwrap();
        }

        assert_eq!(seen, vec!["one", "two"]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_snapshot_is_restartable() {
        let mut store = MessageStore::new();
        store.append(Role::User, "x").unwrap();
        store.append(Role::User, "y").unwrap();

        let snapshot = store.all();
        let first: Vec<_> = snapshot.iter().map(|e| e.sequence_index).collect();
        let second: Vec<_> = snapshot.iter().map(|e| e.sequence_index).collect();
        assert_eq!(first, vec![0, 1]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_append_at_keeps_timestamp() {
        let mut store = MessageStore::new();
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let idx = store.append_at(Role::User, "restored", ts).unwrap();
        assert_eq!(store.get(idx).unwrap().timestamp, ts);
    }

    #[test]
    fn test_last_entry() {
        let mut store = MessageStore::new();
        assert!(store.last().is_none());
        store.append(Role::User, "a").unwrap();
        store.append(Role::Assistant, "b").unwrap();
        assert_eq!(store.last().unwrap().content, "b");
    }
}
