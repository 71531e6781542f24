//! Pipeline orchestration and builder
//!
//! Normalizes input, drives the stream chunker, resolves every chunk's cut
//! point and, for [`ChunkPipeline::build_chunks`], stitches deferred tails
//! into the following chunk.

use crate::{
    chunker::{Chunk, StreamChunker},
    error::{Result, SegmentError},
    extract::{HtmlTextExtractor, TextExtractor},
    normalize::normalize,
    resolver::{BoundaryResolver, ResolvedChunk},
    rules::BoundaryRules,
    stitcher::Stitcher,
    tokenizer::Tokens,
};
use std::{fmt, str::FromStr, sync::Arc, time::Instant};

/// Default decoded-character bound per chunk
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Default lookback window for the sentence search, in characters
pub const DEFAULT_BACKTRACK: usize = 300;

/// What [`ChunkPipeline::process`] should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Resolved chunks
    #[default]
    GetChunks,
    /// Plain text of the whole document
    ExtractText,
}

impl Mode {
    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::GetChunks => "get_chunks",
            Mode::ExtractText => "extract_text",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get_chunks" => Ok(Mode::GetChunks),
            // `get_text` is the historical name of text extraction
            "extract_text" | "get_text" => Ok(Mode::ExtractText),
            other => Err(SegmentError::UnknownMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Result of [`ChunkPipeline::process`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Resolved chunks, not yet stitched
    Chunks(Vec<ResolvedChunk>),
    /// Extracted plain text
    Text(String),
}

impl Output {
    /// Take the chunks, or `None` for text output
    pub fn into_chunks(self) -> Option<Vec<ResolvedChunk>> {
        match self {
            Output::Chunks(chunks) => Some(chunks),
            Output::Text(_) => None,
        }
    }

    /// Take the text, or `None` for chunk output
    pub fn into_text(self) -> Option<String> {
        match self {
            Output::Text(text) => Some(text),
            Output::Chunks(_) => None,
        }
    }
}

/// Markup chunking pipeline
///
/// Stateless between calls; one pipeline can serve many documents from
/// many threads.
#[derive(Clone)]
pub struct ChunkPipeline {
    chunker: StreamChunker,
    resolver: BoundaryResolver,
    extractor: Arc<dyn TextExtractor>,
}

impl fmt::Debug for ChunkPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkPipeline")
            .field("chunker", &self.chunker)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Default for ChunkPipeline {
    fn default() -> Self {
        Self {
            chunker: StreamChunker::new(DEFAULT_MAX_CHARS),
            resolver: BoundaryResolver::with_default_rules(DEFAULT_BACKTRACK),
            extractor: Arc::new(HtmlTextExtractor),
        }
    }
}

impl ChunkPipeline {
    /// Create a pipeline with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring a pipeline
    pub fn builder() -> ChunkPipelineBuilder {
        ChunkPipelineBuilder::new()
    }

    /// Decoded-character bound per chunk
    pub fn max_chars(&self) -> usize {
        self.chunker.max_decoded_chars()
    }

    /// Lookback window in characters
    pub fn backtrack(&self) -> usize {
        self.resolver.backtrack_window()
    }

    /// Run the pipeline in the given mode
    pub fn process(&self, input: &str, mode: Mode) -> Output {
        let start = Instant::now();
        let normalized = normalize(input);

        let output = match mode {
            Mode::ExtractText => Output::Text(self.extractor.extract_text(&normalized)),
            Mode::GetChunks => Output::Chunks(
                self.chunker
                    .chunk(Tokens::new(&normalized))
                    .into_iter()
                    .map(|chunk| self.resolver.resolve_chunk(chunk))
                    .collect(),
            ),
        };

        match &output {
            Output::Chunks(chunks) => log::debug!(
                "{mode}: {} chars normalized into {} chunks in {:?}",
                normalized.chars().count(),
                chunks.len(),
                start.elapsed()
            ),
            Output::Text(text) => log::debug!(
                "{mode}: extracted {} chars in {:?}",
                text.chars().count(),
                start.elapsed()
            ),
        }

        output
    }

    /// Resolve chunks without stitching
    pub fn resolve_chunks(&self, input: &str) -> Vec<ResolvedChunk> {
        self.process(input, Mode::GetChunks)
            .into_chunks()
            .unwrap_or_default()
    }

    /// Chunk, resolve and stitch
    pub fn build_chunks(&self, input: &str) -> Vec<Chunk> {
        Stitcher::new(self).stitch(self.resolve_chunks(input))
    }

    /// Normalize `markup` and extract its plain text
    pub fn extract_text(&self, markup: &str) -> String {
        self.extractor.extract_text(&normalize(markup))
    }
}

impl TextExtractor for ChunkPipeline {
    fn extract_text(&self, markup: &str) -> String {
        ChunkPipeline::extract_text(self, markup)
    }
}

/// Builder for [`ChunkPipeline`]
pub struct ChunkPipelineBuilder {
    max_chars: usize,
    backtrack: usize,
    rules: Option<Arc<BoundaryRules>>,
    extractor: Option<Arc<dyn TextExtractor>>,
}

impl Default for ChunkPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkPipelineBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            backtrack: DEFAULT_BACKTRACK,
            rules: None,
            extractor: None,
        }
    }

    /// Set the decoded-character bound
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the lookback window
    pub fn backtrack(mut self, backtrack: usize) -> Self {
        self.backtrack = backtrack;
        self
    }

    /// Use custom boundary rules
    pub fn rules(mut self, rules: impl Into<Arc<BoundaryRules>>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Use a custom text extractor
    pub fn extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<ChunkPipeline> {
        if self.max_chars == 0 {
            return Err(SegmentError::InvalidConfig(
                "max_chars must be greater than 0".to_string(),
            ));
        }

        let rules = self.rules.unwrap_or_else(BoundaryRules::shared_default);
        Ok(ChunkPipeline {
            chunker: StreamChunker::new(self.max_chars),
            resolver: BoundaryResolver::new(rules, self.backtrack),
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(HtmlTextExtractor)),
        })
    }
}
