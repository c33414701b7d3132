use std::time::{Duration, Instant};

use super::debounce::Debouncer;
use super::engine::{HistorySource, SearchEngine};
use crate::models::SearchResult;

/// What the result panel should show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    /// No query long enough to search
    #[default]
    Idle,
    /// Results of the last executed search (possibly empty)
    Ready { query: String, results: Vec<SearchResult> },
}

/// Search driven by a live input field.
///
/// Every input change goes through [`LiveSearch::on_input`]; the search itself
/// only runs from [`LiveSearch::tick`] once the debounce window has passed.
/// Results of the previous search stay visible while a new one is pending.
#[derive(Debug)]
pub struct LiveSearch {
    engine: SearchEngine,
    debouncer: Debouncer<String>,
    state: SearchState,
    executed: u64,
}

impl LiveSearch {
    pub fn new(engine: SearchEngine, delay: Duration) -> Self {
        Self { engine, debouncer: Debouncer::new(delay), state: SearchState::Idle, executed: 0 }
    }

    /// Feed the current raw contents of the search field
    pub fn on_input(&mut self, raw_query: &str, now: Instant) {
        let query = raw_query.trim();
        if !self.engine.is_searchable(query) {
            self.debouncer.cancel();
            self.state = SearchState::Idle;
            return;
        }
        self.debouncer.schedule(query.to_string(), now);
    }

    /// Run the pending search if it is due. Returns true when results changed.
    pub fn tick<S: HistorySource + ?Sized>(&mut self, source: &S, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.run(source, query);
                true
            }
            None => false,
        }
    }

    /// Run the pending search right away, if there is one
    pub fn flush<S: HistorySource + ?Sized>(&mut self, source: &S) -> bool {
        match self.debouncer.flush() {
            Some(query) => {
                self.run(source, query);
                true
            }
            None => false,
        }
    }

    fn run<S: HistorySource + ?Sized>(&mut self, source: &S, query: String) {
        let results = self.engine.search(source, &query);
        self.executed += 1;
        tracing::debug!(query = %query, hits = results.len(), "live search executed");
        self.state = SearchState::Ready { query, results };
    }

    /// Drop pending work and visible results
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.state = SearchState::Idle;
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Results of the last executed search, or `None` while idle
    pub fn results(&self) -> Option<&[SearchResult]> {
        match &self.state {
            SearchState::Idle => None,
            SearchState::Ready { results, .. } => Some(results),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// How many searches actually ran
    pub fn executed_searches(&self) -> u64 {
        self.executed
    }
}
