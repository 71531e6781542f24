//! Boundary-safe streaming chunker for marked-up documents
//!
//! Long HTML-like documents are split into chunks bounded by a count of
//! decoded characters. Every chunk is then trimmed back to its rightmost
//! safe cut point: never inside a tag, never inside an entity reference and,
//! when a terminator is close enough, never mid-sentence. The deferred tail
//! is stitched onto the next chunk, so concatenating all chunk markup still
//! reproduces the normalized input exactly.
//!
//! # Architecture
//!
//! - **Tokenizer**: tags, text tokens and text units (characters or entities)
//! - **Stream chunker**: size-bounded accumulation over the token stream
//! - **Boundary resolver**: dangling tag, complete ending, windowed sentence search
//! - **Pipeline**: normalization and orchestration
//! - **Stitcher**: single forward pass moving tails into the next chunk
//!
//! # Example
//!
//! ```rust
//! use segmark_core::ChunkPipeline;
//!
//! let pipeline = ChunkPipeline::builder()
//!     .max_chars(14)
//!     .build()
//!     .unwrap();
//!
//! let chunks = pipeline.build_chunks("<p>Sentence one. Sentence two.</p>");
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].text, "Sentence one.");
//! assert_eq!(chunks[1].text, "Sentence two.");
//! ```

#![warn(missing_docs)]

pub mod chunker;
pub mod context;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod resolver;
pub mod response;
pub mod rules;
pub mod stitcher;
pub mod tokenizer;

// Re-export key types
pub use chunker::{Chunk, StreamChunker};
pub use context::{contexts, ChunkContext};
pub use error::{Result, SegmentError};
pub use extract::{HtmlTextExtractor, TextExtractor};
pub use pipeline::{
    ChunkPipeline, ChunkPipelineBuilder, Mode, Output, DEFAULT_BACKTRACK, DEFAULT_MAX_CHARS,
};
pub use resolver::{BoundaryResolver, CutKind, Resolution, ResolvedChunk};
pub use response::{parse_json_or_default, strip_code_fence};
pub use rules::BoundaryRules;
pub use stitcher::Stitcher;
