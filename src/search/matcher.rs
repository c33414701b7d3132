use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::models::Snippet;

/// Case-insensitive literal matcher for one query.
///
/// The query is escaped before it is compiled, so `a.b` only ever matches the
/// text `a.b`. Containment checks and highlight spans share the same compiled
/// pattern and can never disagree.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    regex: Regex,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&regex::escape(query)).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte ranges of every non-overlapping match, scanning left to right.
    /// After a match the scan resumes at its end.
    pub fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(text).filter(|m| !m.is_empty()).map(|m| m.range()).collect()
    }

    pub fn highlight(&self, text: &str) -> Snippet {
        Snippet::new(text.to_string(), self.find_spans(text))
    }
}
