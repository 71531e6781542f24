//! Markdown output formatter

use super::{ChunkRecord, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - one section per chunk with fenced markup
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    chunk_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunk_count: 0,
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_chunk(&mut self, chunk: &ChunkRecord) -> Result<()> {
        self.chunk_count += 1;
        writeln!(
            self.writer,
            "## {}. `{}` #{}",
            self.chunk_count, chunk.source, chunk.index
        )?;
        writeln!(self.writer)?;
        let fence = fence_for(&chunk.markup);
        writeln!(self.writer, "{fence}html")?;
        writeln!(self.writer, "{}", chunk.markup)?;
        writeln!(self.writer, "{fence}")?;
        writeln!(self.writer)?;
        for line in chunk.text.lines().filter(|l| !l.trim().is_empty()) {
            writeln!(self.writer, "> {}", line.trim())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total chunks: {}*", self.chunk_count)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Backtick fence longer than any backtick run inside `content`
fn fence_for(content: &str) -> String {
    let longest_run = content
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}
