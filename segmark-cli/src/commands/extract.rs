//! Extract command implementation

use super::init_logging;
use crate::input::{resolve_patterns, FileReader};
use crate::output::create_sink;
use anyhow::Result;
use clap::Args;
use segmark_core::{ChunkPipeline, Mode, Output};
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the extract command
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ExtractArgs {
    /// Execute the extract command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        // Extraction never chunks, so chunking settings do not apply
        let pipeline = ChunkPipeline::new();
        let files = resolve_patterns(&self.input)?;

        let mut sink = create_sink(self.output.as_deref())?;
        for (i, path) in files.iter().enumerate() {
            let markup = FileReader::read_text(path)?;
            if let Output::Text(text) = pipeline.process(&markup, Mode::ExtractText) {
                if i > 0 {
                    writeln!(sink)?;
                }
                writeln!(sink, "{}", text.trim())?;
            }
        }
        sink.flush()?;

        Ok(())
    }
}
