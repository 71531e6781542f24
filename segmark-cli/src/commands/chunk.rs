//! Chunk command implementation

use super::{build_pipeline, init_logging};
use crate::config::CliConfig;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{create_formatter, create_sink, ChunkRecord, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::Args;
use rayon::prelude::*;
use segmark_core::ChunkPipeline;
use std::path::{Path, PathBuf};

/// Arguments for the chunk command
#[derive(Debug, Args)]
pub struct ChunkArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format [default: text]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Maximum decoded characters per chunk [default: 1000]
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,

    /// Sentence lookback window in characters [default: 300]
    #[arg(long, value_name = "N")]
    pub backtrack: Option<usize>,

    /// Custom boundary rules file
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "SEGMARK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit resolved chunks with their deferred tails instead of stitching
    #[arg(long)]
    pub raw: bool,

    /// Process input files in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Effective settings after merging flags over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSettings {
    /// Maximum decoded characters per chunk
    pub max_chars: usize,
    /// Lookback window
    pub backtrack: usize,
    /// Custom rules file
    pub rules: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
    /// Pretty print JSON
    pub pretty_json: bool,
}

impl ChunkArgs {
    /// Execute the chunk command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {:?}", self);

        let config = CliConfig::load(self.config.as_deref())?;
        let settings = self.settings(&config);
        let pipeline = build_pipeline(
            settings.max_chars,
            settings.backtrack,
            settings.rules.as_deref(),
        )?;

        let files = resolve_patterns(&self.input)?;
        log::info!("Chunking {} files", files.len());

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        let per_file: Vec<Vec<ChunkRecord>> = if self.parallel && files.len() > 1 {
            files
                .par_iter()
                .map(|path| self.chunk_file(&pipeline, path, &progress))
                .collect::<Result<_>>()?
        } else {
            files
                .iter()
                .map(|path| self.chunk_file(&pipeline, path, &progress))
                .collect::<Result<_>>()?
        };
        progress.finish();

        let sink = create_sink(self.output.as_deref())?;
        let mut formatter = create_formatter(settings.format, sink, settings.pretty_json);
        let mut total = 0;
        for record in per_file.iter().flatten() {
            formatter.format_chunk(record)?;
            total += 1;
        }
        formatter.finish()?;

        log::info!("Wrote {total} chunks from {} files", files.len());
        Ok(())
    }

    /// Merge flags over the config file
    pub fn settings(&self, config: &CliConfig) -> ChunkSettings {
        ChunkSettings {
            max_chars: self.max_chars.unwrap_or(config.chunking.max_chars),
            backtrack: self.backtrack.unwrap_or(config.chunking.backtrack),
            rules: self.rules.clone().or_else(|| config.chunking.rules.clone()),
            format: self.format.unwrap_or(config.output.format),
            pretty_json: config.output.pretty_json,
        }
    }

    fn chunk_file(
        &self,
        pipeline: &ChunkPipeline,
        path: &Path,
        progress: &ProgressReporter,
    ) -> Result<Vec<ChunkRecord>> {
        let markup = FileReader::read_text(path)?;
        let source = path.display().to_string();

        let records: Vec<ChunkRecord> = if self.raw {
            pipeline
                .resolve_chunks(&markup)
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| ChunkRecord::resolved(&source, i, chunk))
                .collect()
        } else {
            pipeline
                .build_chunks(&markup)
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| ChunkRecord::stitched(&source, i, chunk))
                .collect()
        };

        progress.file_completed(&source, records.len());
        Ok(records)
    }
}
