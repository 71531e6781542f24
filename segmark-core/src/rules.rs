//! Sentence terminator and closer tables with O(1) lookup
//!
//! The default multilingual set covers Latin, Arabic/Persian, CJK, Indic,
//! Armenian and Ethiopic punctuation. Custom sets load from TOML:
//!
//! ```toml
//! [terminators]
//! chars = [".", "!", "?"]
//!
//! [closers]
//! chars = ["\"", ")", "»"]
//! ```

use crate::error::{Result, SegmentError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Default sentence-ending characters
pub const DEFAULT_TERMINATORS: &[char] = &[
    '.', '!', '?', ';', '؟', '؛', '…', '。', '！', '？', '；', '．', '।', '॥', '։', '።', '፧',
];

/// Default closing quote and bracket characters that may follow a terminator
pub const DEFAULT_CLOSERS: &[char] = &[
    '’', '”', '"', '\'', '»', '›', '）', ')', ']', '】', '》', '〗', '〙', '〛', '〉', '］', '｝',
    '』', '」',
];

static DEFAULT_RULES: LazyLock<Arc<BoundaryRules>> = LazyLock::new(|| {
    Arc::new(
        BoundaryRules::new(DEFAULT_TERMINATORS.to_vec(), DEFAULT_CLOSERS.to_vec())
            .expect("default boundary rules are valid"),
    )
});

/// Fast character membership table
#[derive(Debug, Clone)]
pub struct CharTable {
    /// ASCII lookup table for chars 0-127
    ascii_table: [bool; 128],
    /// HashSet for non-ASCII characters
    non_ascii: HashSet<char>,
}

impl CharTable {
    /// Create from a list of characters
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        let mut ascii_table = [false; 128];
        let mut non_ascii = HashSet::new();

        for ch in chars {
            if ch.is_ascii() {
                ascii_table[ch as usize] = true;
            } else {
                non_ascii.insert(ch);
            }
        }

        Self {
            ascii_table,
            non_ascii,
        }
    }

    /// Check membership - hot path
    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        if ch.is_ascii() {
            self.ascii_table[ch as usize]
        } else {
            self.non_ascii.contains(&ch)
        }
    }
}

/// TOML schema for a rules file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Sentence terminators
    pub terminators: CharList,
    /// Closing quotes and brackets
    #[serde(default)]
    pub closers: CharList,
}

impl RulesConfig {
    /// Parse a rules file body without compiling it
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a rules file without compiling it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}

/// A list of single characters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharList {
    /// The characters
    pub chars: Vec<char>,
}

/// Terminator and closer tables plus the compiled "ends on a sentence" pattern
#[derive(Debug, Clone)]
pub struct BoundaryRules {
    terminators: CharTable,
    closers: CharTable,
    complete_at_end: Regex,
}

impl BoundaryRules {
    /// Build rules from explicit character lists
    pub fn new(terminators: Vec<char>, closers: Vec<char>) -> Result<Self> {
        if terminators.is_empty() {
            return Err(SegmentError::InvalidConfig(
                "at least one sentence terminator is required".to_string(),
            ));
        }

        let complete_at_end = Regex::new(&complete_sentence_pattern(&terminators, &closers))
            .map_err(|e| SegmentError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            terminators: CharTable::new(terminators),
            closers: CharTable::new(closers),
            complete_at_end,
        })
    }

    /// Shared default rules, built once per process
    pub fn shared_default() -> Arc<Self> {
        DEFAULT_RULES.clone()
    }

    /// Parse rules from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Self::from_config(RulesConfig::from_toml_str(source)?)
    }

    /// Load rules from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(RulesConfig::from_file(path)?)
    }

    /// Build rules from a parsed config
    pub fn from_config(config: RulesConfig) -> Result<Self> {
        Self::new(config.terminators.chars, config.closers.chars)
    }

    /// Check if character ends a sentence
    #[inline]
    pub fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(ch)
    }

    /// Check if character is a closing quote or bracket
    #[inline]
    pub fn is_closer(&self, ch: char) -> bool {
        self.closers.contains(ch)
    }

    /// Pattern matching a terminator, optional closers, trailing closing tags
    /// and whitespace, anchored at the end of the input
    pub fn complete_at_end(&self) -> &Regex {
        &self.complete_at_end
    }
}

impl Default for BoundaryRules {
    fn default() -> Self {
        BoundaryRules::clone(&DEFAULT_RULES)
    }
}

fn char_class(chars: &[char]) -> String {
    let escaped: String = chars
        .iter()
        .map(|ch| regex::escape(ch.encode_utf8(&mut [0; 4])))
        .collect();
    format!("[{escaped}]")
}

fn complete_sentence_pattern(terminators: &[char], closers: &[char]) -> String {
    let closers = if closers.is_empty() {
        String::new()
    } else {
        format!("{}*", char_class(closers))
    };
    format!(
        r"(?:\.{{3}}|{}){}(?:\s*</[^>]+>)*\s*$",
        char_class(terminators),
        closers
    )
}
