//! Configuration module
//!
//! Settings resolve in three layers: built-in defaults, then the TOML file
//! given with `--config`, then command-line flags.

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use segmark_core::{DEFAULT_BACKTRACK, DEFAULT_MAX_CHARS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Chunking-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkingConfig {
    /// Maximum decoded characters per chunk
    pub max_chars: usize,

    /// Lookback window for the sentence search, in characters
    pub backtrack: usize,

    /// Custom boundary rules file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<PathBuf>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            backtrack: DEFAULT_BACKTRACK,
            rules: None,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pretty_json: true,
        }
    }
}

impl CliConfig {
    /// Parse configuration from TOML
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml_str(&source)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // Relative rules paths are relative to the config file
        if let Some(rules) = config.chunking.rules.take() {
            let resolved = match path.parent() {
                Some(dir) if rules.is_relative() => dir.join(rules),
                _ => rules,
            };
            config.chunking.rules = Some(resolved);
        }

        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Commented configuration template
    pub fn template() -> String {
        format!(
            r#"# segmark configuration

[chunking]
# Maximum decoded characters per chunk
max_chars = {DEFAULT_MAX_CHARS}

# How far back (in characters) to look for a sentence end
backtrack = {DEFAULT_BACKTRACK}

# Custom boundary rules, relative to this file (optional)
# rules = "rules.toml"

[output]
# One of: text, json, markdown
format = "text"

# Pretty print JSON output
pretty_json = true

# ---------------------------------------------------------------
# Boundary rules file format (save separately, point `rules` at it)
#
# [terminators]
# chars = [".", "!", "?", "。", "！", "？"]
#
# [closers]
# chars = ["\"", "'", ")", "」", "』"]
"#
        )
    }
}
