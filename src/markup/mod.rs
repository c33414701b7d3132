//! Markdown-ish message markup and its plain-text projection.
//!
//! Assistant replies may carry fenced code blocks, inline code and stray HTML.
//! [`parse`] turns raw content into [`Block`]s; the chat pane renders those
//! blocks line by line and [`plain_text`] joins the very same block texts, so
//! what search sees is exactly what the user sees.

mod clean;
mod parser;

pub use clean::{decode_entities, strip_control, strip_tags};
pub use parser::{Block, parse};

/// Derive the searchable plain-text projection of raw message content
pub fn plain_text(content: &str) -> String {
    let blocks = parse(content);
    let mut out = String::with_capacity(content.len());
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(block.text());
    }
    out
}
