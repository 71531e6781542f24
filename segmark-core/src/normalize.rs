//! Input normalization
//!
//! Folds line-oriented whitespace before chunking: blank-line runs collapse,
//! then every non-empty line is stripped and joined with a single space.
//! Both steps are idempotent.

/// Check if a character ends a line
fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split on every line-break character, treating `\r\n` as one break.
/// A trailing break does not produce an empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if !is_line_break(ch) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Strip every line and collapse runs of blank lines into one empty line
pub fn collapse_blank_lines(text: &str) -> String {
    let mut cleaned: Vec<&str> = Vec::new();
    let mut last_blank = false;

    for line in split_lines(text) {
        let stripped = line.trim();
        if stripped.is_empty() {
            if !last_blank {
                cleaned.push("");
            }
            last_blank = true;
        } else {
            cleaned.push(stripped);
            last_blank = false;
        }
    }

    cleaned.join("\n")
}

/// Join all non-empty stripped lines with a single space
pub fn join_lines(text: &str) -> String {
    split_lines(text)
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full normalization applied before chunking
pub fn normalize(text: &str) -> String {
    join_lines(&collapse_blank_lines(text))
}
