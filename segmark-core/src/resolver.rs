//! Boundary resolution for finished chunks
//!
//! Finds the rightmost safe cut point in a chunk's markup: a point with no
//! dangling tag and no mid-sentence split, searched within a bounded
//! lookback window. Checks run in precedence order:
//!
//! 1. dangling tag: cut right before the unmatched `<`
//! 2. already complete: the chunk ends on a terminator, optional closers
//!    and trailing closing tags
//! 3. windowed search: cut after the rightmost genuine terminator in the
//!    last `backtrack_window` characters, carrying closers (literal or
//!    entity-encoded) along with it
//! 4. no boundary: keep the whole chunk

use crate::chunker::Chunk;
use crate::rules::BoundaryRules;
use crate::tokenizer::{tag_spans, TextUnits};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::{Arc, LazyLock};

static CLOSING_TAGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s*</[^>]+>)*\s*").expect("closing tag run pattern is valid")
});

/// How a resolution was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutKind {
    /// Chunk ended inside a tag
    DanglingTag,
    /// Chunk already ended on a sentence
    Complete,
    /// Cut after a sentence terminator inside the window
    Sentence,
    /// No safe cut found; the whole chunk is kept
    NoBoundary,
}

/// Safe prefix and deferred suffix of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Longest safe prefix
    pub head: &'a str,
    /// Incomplete remainder, to be moved to the next chunk
    pub tail: &'a str,
    /// Which rule produced the cut
    pub kind: CutKind,
}

impl<'a> Resolution<'a> {
    fn whole(markup: &'a str, kind: CutKind) -> Self {
        Self {
            head: markup,
            tail: "",
            kind,
        }
    }

    fn split(markup: &'a str, at: usize, kind: CutKind) -> Self {
        let (head, tail) = markup.split_at(at);
        Self { head, tail, kind }
    }

    /// Check if nothing is deferred
    pub fn is_complete(&self) -> bool {
        self.tail.is_empty()
    }
}

/// A chunk together with its boundary resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedChunk {
    /// Exact markup assigned to this chunk
    pub markup: String,
    /// Decoded text view
    pub text: String,
    /// Safe prefix of `markup`
    pub head: String,
    /// Unsafe suffix of `markup`
    pub tail: String,
    /// Which rule produced the cut
    pub cut: CutKind,
}

impl ResolvedChunk {
    /// Drop the resolution, keeping markup and text
    pub fn into_chunk(self) -> Chunk {
        Chunk {
            markup: self.markup,
            text: self.text,
        }
    }
}

/// Resolves the safe cut point of chunk markup
#[derive(Debug, Clone)]
pub struct BoundaryResolver {
    rules: Arc<BoundaryRules>,
    backtrack_window: usize,
}

impl BoundaryResolver {
    /// Create a resolver with the given rules and lookback window (in chars)
    pub fn new(rules: Arc<BoundaryRules>, backtrack_window: usize) -> Self {
        Self {
            rules,
            backtrack_window,
        }
    }

    /// Create a resolver with the default multilingual rules
    pub fn with_default_rules(backtrack_window: usize) -> Self {
        Self::new(BoundaryRules::shared_default(), backtrack_window)
    }

    /// Lookback window in characters
    pub fn backtrack_window(&self) -> usize {
        self.backtrack_window
    }

    /// Split `markup` into its safe head and deferred tail
    pub fn resolve<'a>(&self, markup: &'a str) -> Resolution<'a> {
        if markup.is_empty() {
            return Resolution::whole(markup, CutKind::Complete);
        }

        if let Some(lt) = dangling_tag_start(markup) {
            return Resolution::split(markup, lt, CutKind::DanglingTag);
        }

        if self.ends_on_sentence(markup) {
            return Resolution::whole(markup, CutKind::Complete);
        }

        match self.sentence_cut(markup) {
            Some(cut) if cut < markup.len() => Resolution::split(markup, cut, CutKind::Sentence),
            Some(_) => Resolution::whole(markup, CutKind::Complete),
            None => Resolution::whole(markup, CutKind::NoBoundary),
        }
    }

    /// Resolve an owned chunk
    pub fn resolve_chunk(&self, chunk: Chunk) -> ResolvedChunk {
        let (head, tail, cut) = {
            let resolution = self.resolve(&chunk.markup);
            if !resolution.is_complete() {
                log::debug!(
                    "deferring {} byte tail ({:?})",
                    resolution.tail.len(),
                    resolution.kind
                );
            }
            (
                resolution.head.to_string(),
                resolution.tail.to_string(),
                resolution.kind,
            )
        };

        ResolvedChunk {
            markup: chunk.markup,
            text: chunk.text,
            head,
            tail,
            cut,
        }
    }

    /// A trailing entity reference counts as complete: its `;` is a listed
    /// terminator at the very end of the markup
    fn ends_on_sentence(&self, markup: &str) -> bool {
        self.rules.complete_at_end().is_match(markup)
    }

    /// Byte offset just past the rightmost genuine terminator in the window,
    /// extended over closers and trailing closing tags
    fn sentence_cut(&self, markup: &str) -> Option<usize> {
        let window_start = window_start(markup, self.backtrack_window);
        let spans: Vec<Range<usize>> = tag_spans(markup)
            .filter(|span| span.end > window_start)
            .collect();
        let in_tag = |pos: usize| {
            let i = spans.partition_point(|span| span.end <= pos);
            spans.get(i).is_some_and(|span| span.start <= pos)
        };

        let (pos, ch) = markup[window_start..]
            .char_indices()
            .rev()
            .map(|(i, ch)| (window_start + i, ch))
            .find(|&(pos, ch)| {
                self.rules.is_terminator(ch)
                    && !in_tag(pos)
                    && !(ch == ';' && is_entity_semicolon(markup, pos))
            })?;

        let mut cut = pos + ch.len_utf8();
        cut += TextUnits::new(&markup[cut..])
            .take_while(|unit| {
                !unit.decoded.is_empty() && unit.decoded.chars().all(|c| self.rules.is_closer(c))
            })
            .map(|unit| unit.raw.len())
            .sum::<usize>();
        if let Some(m) = CLOSING_TAGS_RE.find(&markup[cut..]) {
            cut += m.end();
        }

        Some(cut)
    }
}

/// Resolve with the default rules
pub fn resolve(markup: &str, backtrack_window: usize) -> Resolution<'_> {
    BoundaryResolver::with_default_rules(backtrack_window).resolve(markup)
}

/// Byte offset of an unterminated trailing `<`, if any
pub fn dangling_tag_start(markup: &str) -> Option<usize> {
    let lt = markup.rfind('<')?;
    match markup.rfind('>') {
        Some(gt) if gt > lt => None,
        _ => Some(lt),
    }
}

/// Check if the `;` at byte `pos` closes an entity reference
fn is_entity_semicolon(markup: &str, pos: usize) -> bool {
    let mut before = markup[..pos].chars().rev();
    loop {
        match before.next() {
            Some('&') => return true,
            Some(c) if c.is_alphanumeric() || c == '#' => continue,
            _ => return false,
        }
    }
}

fn window_start(markup: &str, backtrack_window: usize) -> usize {
    if backtrack_window == 0 {
        return markup.len();
    }
    markup
        .char_indices()
        .rev()
        .nth(backtrack_window - 1)
        .map_or(0, |(i, _)| i)
}
