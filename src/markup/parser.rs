use super::clean::{decode_entities, strip_control, strip_tags};

const FENCE: &str = "```";

/// A rendered unit of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Code { language: Option<String>, body: String },
}

impl Block {
    /// The text shown to the user for this block
    pub fn text(&self) -> &str {
        match self {
            Block::Text(text) => text,
            Block::Code { body, .. } => body,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Block::Code { .. })
    }
}

/// Split raw content into text and fenced code blocks.
///
/// A line whose first non-blank characters are three backticks opens or closes
/// a fence; anything after the opening backticks is the language tag. An
/// unclosed fence runs to the end of the content. Blocks with no visible text
/// are dropped.
pub fn parse(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut text_lines: Vec<&str> = Vec::new();
    let mut open_code: Option<(Option<String>, Vec<&str>)> = None;

    for line in content.lines() {
        if let Some(rest) = line.trim_start().strip_prefix(FENCE) {
            match open_code.take() {
                Some((language, body)) => push_code(&mut blocks, language, &body),
                None => {
                    flush_text(&mut blocks, &mut text_lines);
                    let tag = rest.trim().trim_matches('`');
                    let language = if tag.is_empty() { None } else { Some(tag.to_string()) };
                    open_code = Some((language, Vec::new()));
                }
            }
            continue;
        }

        match open_code.as_mut() {
            Some((_, body)) => body.push(line),
            None => text_lines.push(line),
        }
    }

    if let Some((language, body)) = open_code {
        push_code(&mut blocks, language, &body);
    }
    flush_text(&mut blocks, &mut text_lines);

    blocks
}

fn flush_text(blocks: &mut Vec<Block>, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join("\n");
    lines.clear();

    // Control characters go first so escapes can't hide inside tags,
    // entities last so decoded `&lt;b&gt;` stays literal text.
    let cleaned = decode_entities(&strip_tags(&strip_control(&joined))).replace('`', "");
    let trimmed = cleaned.trim_matches(|c| c == '\n' || c == ' ' || c == '\t');
    if !trimmed.is_empty() {
        blocks.push(Block::Text(trimmed.to_string()));
    }
}

fn push_code(blocks: &mut Vec<Block>, language: Option<String>, body: &[&str]) {
    let body = strip_control(&body.join("\n"));
    if body.trim().is_empty() {
        return;
    }
    blocks.push(Block::Code { language, body });
}
