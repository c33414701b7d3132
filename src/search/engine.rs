use chrono::{DateTime, Utc};

use super::matcher::QueryMatcher;
use crate::models::{SearchResult, Snippet};
use crate::store::{MessageStore, Snapshot};

/// Queries shorter than this (in characters, after trimming) are not searched
pub const MIN_QUERY_CHARS: usize = 2;

/// Anything that can hand the engine a consistent view of the history
pub trait HistorySource {
    fn snapshot(&self) -> Snapshot;
}

impl HistorySource for MessageStore {
    fn snapshot(&self) -> Snapshot {
        self.all()
    }
}

/// Case-insensitive literal substring search over entry plain text.
///
/// No tokenization, no fuzzy matching, no ranking: results come back in
/// ascending sequence index.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    min_query_chars: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self { min_query_chars: MIN_QUERY_CHARS }
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a query is long enough to be searched at all
    pub fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_chars
    }

    pub fn search<S: HistorySource + ?Sized>(&self, source: &S, query: &str) -> Vec<SearchResult> {
        self.search_at(source, query, Utc::now())
    }

    /// Search with an explicit execution time recorded on every result
    pub fn search_at<S: HistorySource + ?Sized>(
        &self,
        source: &S,
        query: &str,
        matched_at: DateTime<Utc>,
    ) -> Vec<SearchResult> {
        let query = query.trim();
        if !self.is_searchable(query) {
            return Vec::new();
        }

        let matcher = match QueryMatcher::new(query) {
            Ok(matcher) => matcher,
            Err(e) => {
                tracing::warn!(error = %e, "query could not be compiled, returning no results");
                return Vec::new();
            }
        };

        let snapshot = source.snapshot();
        let results: Vec<SearchResult> = snapshot
            .iter()
            .filter_map(|entry| {
                let spans = matcher.find_spans(&entry.plain_text);
                if spans.is_empty() {
                    return None;
                }
                Some(SearchResult {
                    source_index: entry.sequence_index,
                    role: entry.role,
                    snippet: Snippet::new(entry.plain_text.clone(), spans),
                    matched_at,
                })
            })
            .collect();

        tracing::debug!(query, scanned = snapshot.len(), hits = results.len(), "search finished");
        results
    }
}
