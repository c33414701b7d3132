use std::fmt;
use std::ops::Range;

use chrono::{DateTime, Utc};

use super::chat::Role;

/// Opening marker used when a snippet is rendered as marked-up text
pub const HIGHLIGHT_OPEN: &str = "<mark>";
/// Closing marker used when a snippet is rendered as marked-up text
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Plain text with the byte ranges of every query match.
///
/// Spans are sorted, non-overlapping and always fall on char boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    pub spans: Vec<Range<usize>>,
}

/// A run of snippet text that is either highlighted or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetSegment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

impl Snippet {
    pub fn new(text: String, spans: Vec<Range<usize>>) -> Self {
        Self { text, spans }
    }

    pub fn match_count(&self) -> usize {
        self.spans.len()
    }

    /// Split the text into alternating plain and highlighted runs.
    /// Empty runs are omitted.
    pub fn segments(&self) -> Vec<SnippetSegment<'_>> {
        let mut segments = Vec::with_capacity(self.spans.len() * 2 + 1);
        let mut cursor = 0;

        for span in &self.spans {
            if span.start > cursor {
                segments.push(SnippetSegment {
                    text: &self.text[cursor..span.start],
                    highlighted: false,
                });
            }
            segments.push(SnippetSegment { text: &self.text[span.clone()], highlighted: true });
            cursor = span.end;
        }

        if cursor < self.text.len() {
            segments.push(SnippetSegment { text: &self.text[cursor..], highlighted: false });
        }

        segments
    }

    /// Render with every match wrapped in the given markers
    pub fn marked(&self, open: &str, close: &str) -> String {
        let extra = self.spans.len() * (open.len() + close.len());
        let mut out = String::with_capacity(self.text.len() + extra);
        for segment in self.segments() {
            if segment.highlighted {
                out.push_str(open);
                out.push_str(segment.text);
                out.push_str(close);
            } else {
                out.push_str(segment.text);
            }
        }
        out
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.marked(HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE))
    }
}

/// One hit from a search pass. Holds the entry's index, never the entry itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub source_index: usize,
    pub role: Role,
    pub snippet: Snippet,
    pub matched_at: DateTime<Utc>,
}
