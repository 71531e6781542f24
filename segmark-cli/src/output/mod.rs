//! Output formatting module

use anyhow::{Context, Result};
use segmark_core::{Chunk, CutKind, ResolvedChunk};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Chunk markup separated by header lines
    #[default]
    Text,
    /// JSON array of chunk records
    Json,
    /// Markdown sections with fenced markup
    Markdown,
}

impl OutputFormat {
    /// All formats with a short description
    pub const ALL: [(OutputFormat, &'static str); 3] = [
        (OutputFormat::Text, "chunk markup separated by header lines"),
        (OutputFormat::Json, "JSON array of chunk records"),
        (OutputFormat::Markdown, "markdown sections with fenced markup"),
    ];
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        })
    }
}

/// One chunk of one input file, ready for output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Input file the chunk came from
    pub source: String,
    /// Zero-based position within the file
    pub index: usize,
    /// Chunk markup
    pub markup: String,
    /// Plain-text view
    pub text: String,
    /// Safe prefix, present for unstitched output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Deferred suffix, present for unstitched output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<String>,
    /// Rule that produced the cut, present for unstitched output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut: Option<CutKind>,
}

impl ChunkRecord {
    /// Record for a stitched chunk
    pub fn stitched(source: &str, index: usize, chunk: Chunk) -> Self {
        Self {
            source: source.to_string(),
            index,
            markup: chunk.markup,
            text: chunk.text,
            head: None,
            tail: None,
            cut: None,
        }
    }

    /// Record for a resolved, unstitched chunk
    pub fn resolved(source: &str, index: usize, chunk: ResolvedChunk) -> Self {
        Self {
            source: source.to_string(),
            index,
            markup: chunk.markup,
            text: chunk.text,
            head: Some(chunk.head),
            tail: Some(chunk.tail),
            cut: Some(chunk.cut),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output a single chunk
    fn format_chunk(&mut self, chunk: &ChunkRecord) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Output sink shared by all formatters
pub type Sink = Box<dyn Write + Send + Sync>;

/// Open `path` for writing, or stdout when absent
pub fn create_sink(path: Option<&Path>) -> Result<Sink> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Build the formatter for `format`
pub fn create_formatter(format: OutputFormat, sink: Sink, pretty_json: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(sink)),
        OutputFormat::Json => Box::new(JsonFormatter::new(sink, pretty_json)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(sink)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_round_trip_through_serde() {
        for (format, _) in OutputFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{format}\""));
        }
    }

    #[test]
    fn test_resolved_record_keeps_cut() {
        let record = ChunkRecord::resolved(
            "a.html",
            2,
            ResolvedChunk {
                markup: "One. Tw".to_string(),
                text: "One. Tw".to_string(),
                head: "One. ".to_string(),
                tail: "Tw".to_string(),
                cut: CutKind::Sentence,
            },
        );
        assert_eq!(record.tail.as_deref(), Some("Tw"));
        assert_eq!(record.cut, Some(CutKind::Sentence));
    }

    #[test]
    fn test_stitched_record_omits_resolution() {
        let record = ChunkRecord::stitched("a.html", 0, Chunk::new("<p>x</p>", "x"));
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"tail\""));
        assert!(json.contains("\"markup\":\"<p>x</p>\""));
    }
}
