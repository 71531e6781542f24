//! Forward stitching of resolved chunks
//!
//! Walks the sequence once and moves each chunk's unsafe tail to the head
//! of the following chunk. Text views of every mutated chunk are re-derived
//! from the updated markup, never concatenated.

use crate::chunker::Chunk;
use crate::extract::TextExtractor;
use crate::resolver::ResolvedChunk;

/// Reattaches deferred tails to the following chunk
pub struct Stitcher<'e> {
    extractor: &'e dyn TextExtractor,
}

impl<'e> Stitcher<'e> {
    /// Create a stitcher that re-derives text with `extractor`
    pub fn new(extractor: &'e dyn TextExtractor) -> Self {
        Self { extractor }
    }

    /// Stitch in place, keeping the resolution fields current
    pub fn stitch_in_place(&self, chunks: &mut [ResolvedChunk]) {
        for i in 0..chunks.len().saturating_sub(1) {
            if chunks[i].tail.is_empty() {
                continue;
            }

            let (left, right) = chunks.split_at_mut(i + 1);
            let current = &mut left[i];
            let next = &mut right[0];

            let tail = std::mem::take(&mut current.tail);
            current.markup = current.head.clone();
            current.text = self.extractor.extract_text(&current.markup);

            next.markup.insert_str(0, &tail);
            next.head.insert_str(0, &tail);
            next.text = self.extractor.extract_text(&next.markup);
        }
    }

    /// Stitch and drop the resolution fields
    pub fn stitch(&self, mut chunks: Vec<ResolvedChunk>) -> Vec<Chunk> {
        self.stitch_in_place(&mut chunks);
        chunks.into_iter().map(ResolvedChunk::into_chunk).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::CutKind;

    fn resolved(head: &str, tail: &str) -> ResolvedChunk {
        ResolvedChunk {
            markup: format!("{head}{tail}"),
            text: format!("{head}{tail}"),
            head: head.to_string(),
            tail: tail.to_string(),
            cut: if tail.is_empty() {
                CutKind::Complete
            } else {
                CutKind::Sentence
            },
        }
    }

    fn upper(markup: &str) -> String {
        markup.to_uppercase()
    }

    #[test]
    fn test_tail_moves_forward() {
        let stitched = Stitcher::new(&upper).stitch(vec![
            resolved("One. ", "Tw"),
            resolved("o. Three.", ""),
        ]);

        assert_eq!(
            stitched,
            vec![
                Chunk::new("One. ", "ONE. "),
                Chunk::new("Two. Three.", "TWO. THREE."),
            ]
        );
    }

    #[test]
    fn test_last_chunk_keeps_its_tail() {
        let stitched = Stitcher::new(&upper).stitch(vec![
            resolved("A. ", ""),
            resolved("B. ", "c"),
        ]);

        assert_eq!(stitched[1].markup, "B. c");
        assert_eq!(stitched[1].text, "B. c");
    }

    #[test]
    fn test_tails_chain_through_sequence() {
        let mut chunks = vec![
            resolved("a. ", "b"),
            resolved("b. ", "c"),
            resolved("c.", ""),
        ];
        Stitcher::new(&upper).stitch_in_place(&mut chunks);

        let markups: Vec<_> = chunks.iter().map(|c| c.markup.as_str()).collect();
        assert_eq!(markups, vec!["a. ", "bb. ", "cc."]);
        assert_eq!(chunks[1].head, "bb. ");
        assert!(chunks[0].tail.is_empty());
    }

    #[test]
    fn test_untouched_chunks_keep_text() {
        let stitched = Stitcher::new(&upper).stitch(vec![
            resolved("Done. ", ""),
            resolved("Also done.", ""),
        ]);
        assert_eq!(stitched[0].text, "Done. ");
        assert_eq!(stitched[1].text, "Also done.");
    }

    #[test]
    fn test_empty_sequence() {
        assert!(Stitcher::new(&upper).stitch(Vec::new()).is_empty());
    }
}
