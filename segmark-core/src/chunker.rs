//! Size-bounded streaming chunker
//!
//! Consumes the token stream and emits chunks capped by a count of decoded
//! characters. Tags are atomic and never split; chunk boundaries always fall
//! between text units, so an entity reference is never cut in half.

use crate::tokenizer::{is_closing_tag, tag_name, TextUnit, TextUnits, Token};
use serde::{Deserialize, Serialize};

/// Elements whose closing tag implies a line break in the decoded text
pub const BLOCK_BREAK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "table", "tr", "th",
    "td", "thead", "tbody", "tfoot", "pre", "code",
];

/// A bounded slice of the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Exact markup assigned to this chunk
    pub markup: String,
    /// Decoded text view, trimmed
    pub text: String,
}

impl Chunk {
    /// Create a chunk from its two views
    pub fn new(markup: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            text: text.into(),
        }
    }
}

/// Check if a raw tag injects a newline into the decoded text
pub fn breaks_line(tag: &str) -> bool {
    match tag_name(tag) {
        Some(name) if name == "br" => true,
        Some(name) => is_closing_tag(tag) && BLOCK_BREAK_TAGS.contains(&name.as_str()),
        None => false,
    }
}

/// Buffers for the chunk under construction
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    markup: String,
    text: String,
    decoded_len: usize,
}

impl ChunkAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded characters accumulated so far
    pub fn decoded_len(&self) -> usize {
        self.decoded_len
    }

    /// Check if nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.text.is_empty()
    }

    /// Append a tag; it only counts toward the length when it breaks a line
    pub fn push_tag(&mut self, tag: &str) {
        self.markup.push_str(tag);
        if breaks_line(tag) {
            self.text.push('\n');
            self.decoded_len += 1;
        }
    }

    /// Append a text unit
    pub fn push_unit(&mut self, unit: &TextUnit<'_>) {
        self.markup.push_str(unit.raw);
        self.text.push_str(&unit.decoded);
        self.decoded_len += unit.decoded_len();
    }

    /// Take the buffered content as a chunk and reset
    pub fn flush(&mut self) -> Option<Chunk> {
        if self.is_empty() {
            return None;
        }

        let text = std::mem::take(&mut self.text);
        let chunk = Chunk {
            markup: std::mem::take(&mut self.markup),
            text: text.trim().to_string(),
        };
        log::trace!(
            "flushed chunk: {} decoded chars, {} markup bytes",
            self.decoded_len,
            chunk.markup.len()
        );
        self.decoded_len = 0;

        Some(chunk)
    }
}

/// Splits a token stream into size-bounded chunks
#[derive(Debug, Clone, Copy)]
pub struct StreamChunker {
    max_decoded_chars: usize,
}

impl StreamChunker {
    /// Create a chunker with the given decoded-character bound
    pub fn new(max_decoded_chars: usize) -> Self {
        Self { max_decoded_chars }
    }

    /// Configured bound
    pub fn max_decoded_chars(&self) -> usize {
        self.max_decoded_chars
    }

    /// Chunk a token stream
    pub fn chunk<'a>(&self, tokens: impl IntoIterator<Item = Token<'a>>) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut acc = ChunkAccumulator::new();

        for token in tokens {
            match token {
                Token::Tag(tag) => acc.push_tag(tag),
                Token::Text(text) => {
                    for unit in TextUnits::new(text) {
                        if acc.decoded_len() > 0
                            && acc.decoded_len() + unit.decoded_len() > self.max_decoded_chars
                        {
                            chunks.extend(acc.flush());
                        }
                        acc.push_unit(&unit);
                    }
                }
            }
        }
        chunks.extend(acc.flush());

        chunks
    }
}
