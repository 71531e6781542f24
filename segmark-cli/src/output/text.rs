//! Plain text output formatter

use super::{ChunkRecord, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// Plain text formatter - chunk markup under a header line
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_chunk(&mut self, chunk: &ChunkRecord) -> Result<()> {
        writeln!(self.writer, "--- {} #{} ---", chunk.source, chunk.index)?;
        match (&chunk.head, &chunk.tail) {
            (Some(head), Some(tail)) if !tail.is_empty() => {
                writeln!(self.writer, "{head}")?;
                if let Some(cut) = chunk.cut {
                    writeln!(self.writer, "--- deferred ({cut:?}) ---")?;
                }
                writeln!(self.writer, "{tail}")?;
            }
            _ => writeln!(self.writer, "{}", chunk.markup)?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
