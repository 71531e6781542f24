//! Neighbour context for prompt building
//!
//! Model prompts for translation and rewriting carry the previous and next
//! chunk alongside the current one.

use crate::chunker::Chunk;

/// A chunk with its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkContext<'a> {
    /// Position of `current` in the sequence
    pub index: usize,
    /// Length of the sequence
    pub total: usize,
    /// Preceding chunk, if any
    pub previous: Option<&'a Chunk>,
    /// The chunk itself
    pub current: &'a Chunk,
    /// Following chunk, if any
    pub next: Option<&'a Chunk>,
}

impl ChunkContext<'_> {
    /// Check if this is the first chunk
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Check if this is the last chunk
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// Iterate over every chunk together with its neighbours
pub fn contexts(chunks: &[Chunk]) -> impl Iterator<Item = ChunkContext<'_>> {
    let total = chunks.len();
    chunks.iter().enumerate().map(move |(index, current)| ChunkContext {
        index,
        total,
        previous: index.checked_sub(1).and_then(|i| chunks.get(i)),
        current,
        next: chunks.get(index + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_edges() {
        let chunks = vec![
            Chunk::new("<p>a</p>", "a"),
            Chunk::new("<p>b</p>", "b"),
            Chunk::new("<p>c</p>", "c"),
        ];
        let all: Vec<_> = contexts(&chunks).collect();

        assert_eq!(all.len(), 3);
        assert!(all[0].is_first());
        assert_eq!(all[0].previous, None);
        assert_eq!(all[0].next.map(|c| c.text.as_str()), Some("b"));

        assert_eq!(all[1].previous.map(|c| c.text.as_str()), Some("a"));
        assert_eq!(all[1].next.map(|c| c.text.as_str()), Some("c"));

        assert!(all[2].is_last());
        assert_eq!(all[2].next, None);
    }

    #[test]
    fn test_single_chunk_has_no_neighbours() {
        let chunks = vec![Chunk::new("only", "only")];
        let ctx = contexts(&chunks).next().unwrap();
        assert!(ctx.is_first() && ctx.is_last());
        assert_eq!((ctx.previous, ctx.next), (None, None));
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(contexts(&[]).count(), 0);
    }
}
