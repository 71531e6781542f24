//! Helpers for consuming model responses
//!
//! Models often wrap structured answers in Markdown code fences. Responses
//! are parsed strictly with `serde_json`; anything that does not parse falls
//! back to the empty value instead of being coerced.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```(?:json|html)?\n?(.*)```$").expect("code fence pattern is valid")
});

/// Remove an enclosing ```` ``` ```` / ```` ```json ```` / ```` ```html ```` fence
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    match CODE_FENCE_RE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

/// Parse a JSON response, returning `T::default()` when it is malformed
pub fn parse_json_or_default<T>(response: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let body = strip_code_fence(response);
    match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("discarding malformed JSON response: {e}");
            T::default()
        }
    }
}
