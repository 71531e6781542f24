//! Error types
//!
//! The chunking algorithm itself never fails: malformed markup degrades to
//! text and an unresolvable boundary keeps the whole chunk. Errors only come
//! from the configuration surface (pipeline settings, rule files, mode names).

use thiserror::Error;

/// Errors raised while configuring a pipeline
#[derive(Error, Debug)]
pub enum SegmentError {
    /// Invalid pipeline or rules configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Processing mode name not recognised
    #[error("unknown processing mode '{mode}' (expected 'get_chunks' or 'extract_text')")]
    UnknownMode {
        /// The mode string that was supplied
        mode: String,
    },

    /// Rules file could not be parsed
    #[error("failed to parse boundary rules: {0}")]
    RulesParse(#[from] toml::de::Error),

    /// I/O error while reading a rules file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, SegmentError>;
