//! Plain-text extraction from markup
//!
//! The chunker only relies on the contract: given markup, return a
//! whitespace-joined rendering of its visible text, never failing on
//! malformed input. [`HtmlTextExtractor`] is the default implementation.

use scraper::Html;
use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

/// Converts markup into plain text
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of `markup`
    fn extract_text(&self, markup: &str) -> String;
}

/// HTML5 fragment extractor: every text node joined by a single space
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTextExtractor;

impl TextExtractor for HtmlTextExtractor {
    fn extract_text(&self, markup: &str) -> String {
        let fragment = Html::parse_fragment(markup);
        fragment
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<F> TextExtractor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn extract_text(&self, markup: &str) -> String {
        self(markup)
    }
}

// Parser results keyed by the raw reference, filled once per distinct form.
static PARSED_ENTITIES: LazyLock<RwLock<HashMap<String, Option<String>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

const MAX_CACHED_ENTITIES: usize = 4096;

/// Resolve a single entity reference through the HTML parser.
///
/// Returns `None` when the parser leaves the reference untouched.
/// Results are memoized per process.
pub(crate) fn decode_with_html_parser(entity: &str) -> Option<String> {
    if let Ok(cache) = PARSED_ENTITIES.read() {
        if let Some(decoded) = cache.get(entity) {
            return decoded.clone();
        }
    }

    let decoded = parse_entity(entity);
    if let Ok(mut cache) = PARSED_ENTITIES.write() {
        if cache.len() < MAX_CACHED_ENTITIES {
            cache.insert(entity.to_string(), decoded.clone());
        }
    }
    decoded
}

fn parse_entity(entity: &str) -> Option<String> {
    let fragment = Html::parse_fragment(entity);
    let decoded: String = fragment.root_element().text().collect();

    if decoded.is_empty() || decoded == entity {
        None
    } else {
        Some(decoded)
    }
}
