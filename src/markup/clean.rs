//! Text cleanup passes used by the markup parser.
//!
//! Message content ends up on a terminal, so escape sequences and control
//! characters are removed before anything else looks at it.

const ENTITIES: [(&str, char); 6] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&nbsp;", ' '),
];

/// Remove ANSI CSI sequences and control characters other than `\n` and `\t`
///
/// # Examples
///
/// ```
/// use quantum_chat::markup::strip_control;
///
/// assert_eq!(strip_control("\x1b[31mred\x1b[0m\x07"), "red");
/// ```
pub fn strip_control(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                // CSI ends at the first final byte in the @..~ range
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        break;
                    }
                }
            }
            continue;
        }
        if ch.is_control() && ch != '\n' && ch != '\t' {
            continue;
        }
        out.push(ch);
    }

    out
}

/// Remove HTML tags and comments. A `<` that does not start a tag is kept.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        let end = if candidate.starts_with("<!--") {
            candidate.find("-->").map(|i| i + 3)
        } else if candidate[1..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!')
        {
            candidate.find('>').map(|i| i + 1)
        } else {
            None
        };

        match end {
            Some(end) => rest = &candidate[end..],
            None => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the handful of HTML entities assistants tend to emit
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    'outer: while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        for (entity, replacement) in ENTITIES {
            if candidate.starts_with(entity) {
                out.push(replacement);
                rest = &candidate[entity.len()..];
                continue 'outer;
            }
        }
        out.push('&');
        rest = &candidate[1..];
    }

    out.push_str(rest);
    out
}
