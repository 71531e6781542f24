//! CLI command implementations

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use clap::Subcommand;
use segmark_core::rules::{DEFAULT_CLOSERS, DEFAULT_TERMINATORS};
use segmark_core::{BoundaryRules, ChunkPipeline};
use std::io::{self, Write};
use std::path::Path;

pub mod chunk;
pub mod extract;
pub mod generate_config;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split marked-up documents into boundary-safe chunks
    Chunk(chunk::ChunkArgs),

    /// Extract plain text from marked-up documents
    Extract(extract::ExtractArgs),

    /// Generate a configuration file template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Validate a boundary rules file
    Validate(validate::ValidateArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

impl Commands {
    /// Run the selected command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Chunk(args) => args.execute(),
            Commands::Extract(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
        }
    }
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// List available output formats
    Formats,

    /// List the default sentence terminators and closers
    Terminators,
}

impl ListCommands {
    /// Print the listing to stdout
    pub fn execute(self) -> Result<()> {
        self.write_to(&mut io::stdout().lock())
    }

    fn write_to<W: Write>(self, out: &mut W) -> Result<()> {
        match self {
            ListCommands::Formats => {
                for (format, description) in OutputFormat::ALL {
                    writeln!(out, "{format:<10} {description}")?;
                }
            }
            ListCommands::Terminators => {
                let terminators: String = DEFAULT_TERMINATORS.iter().collect();
                let closers: String = DEFAULT_CLOSERS.iter().collect();
                writeln!(out, "terminators: {terminators}")?;
                writeln!(out, "closers:     {closers}")?;
            }
        }
        Ok(())
    }
}

/// Initialize logging based on verbosity level
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // A logger may already be installed when commands run in-process
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}

/// Build a pipeline from resolved settings
pub(crate) fn build_pipeline(
    max_chars: usize,
    backtrack: usize,
    rules: Option<&Path>,
) -> Result<ChunkPipeline> {
    let mut builder = ChunkPipeline::builder()
        .max_chars(max_chars)
        .backtrack(backtrack);

    if let Some(path) = rules {
        let rules = BoundaryRules::from_file(path)
            .with_context(|| format!("Failed to load rules file: {}", path.display()))?;
        builder = builder.rules(rules);
    }

    let pipeline = builder
        .build()
        .map_err(|e| CliError::ConfigError(e.to_string()))?;
    log::debug!("{pipeline:?}");
    Ok(pipeline)
}
