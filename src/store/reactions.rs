use std::collections::{BTreeMap, BTreeSet};

use super::error::StoreError;
use super::message_store::MessageStore;
use crate::models::Reaction;

/// Side mapping from entry index to the reactions attached to it
#[derive(Debug, Clone, Default)]
pub struct ReactionBoard {
    by_entry: BTreeMap<usize, BTreeSet<Reaction>>,
}

impl ReactionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a reaction. Adding one that is already present is a no-op.
    pub fn add(
        &mut self,
        store: &MessageStore,
        index: usize,
        reaction: Reaction,
    ) -> Result<(), StoreError> {
        store.get(index)?;
        self.by_entry.entry(index).or_default().insert(reaction);
        Ok(())
    }

    /// Add the reaction if absent, remove it if present.
    /// Returns whether the reaction is now attached.
    pub fn toggle(
        &mut self,
        store: &MessageStore,
        index: usize,
        reaction: Reaction,
    ) -> Result<bool, StoreError> {
        store.get(index)?;
        let set = self.by_entry.entry(index).or_default();
        let attached = if set.remove(&reaction) {
            false
        } else {
            set.insert(reaction);
            true
        };
        if set.is_empty() {
            self.by_entry.remove(&index);
        }
        Ok(attached)
    }

    pub fn remove(&mut self, index: usize, reaction: Reaction) -> bool {
        let Some(set) = self.by_entry.get_mut(&index) else {
            return false;
        };
        let removed = set.remove(&reaction);
        if set.is_empty() {
            self.by_entry.remove(&index);
        }
        removed
    }

    /// Reactions on an entry, in a stable order
    pub fn reactions(&self, index: usize) -> Vec<Reaction> {
        self.by_entry.get(&index).map(|set| set.iter().copied().collect()).unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.by_entry.values().map(BTreeSet::len).sum()
    }
}
