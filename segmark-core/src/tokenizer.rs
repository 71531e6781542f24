//! Markup tokenization
//!
//! Splits raw markup into tag and text tokens, and text tokens into text
//! units (one character or one entity reference). Every token and unit
//! borrows its raw form from the input, so concatenating raw forms always
//! reconstructs the input exactly. Malformed markup degrades to text.

use crate::extract::decode_with_html_parser;
use regex::{Matches, Regex};
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&[A-Za-z0-9#]+;").expect("entity pattern is valid"));

static TAG_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<\s*/?\s*([a-zA-Z0-9]+)").expect("tag name pattern is valid")
});

/// A markup token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A complete `<...>` span
    Tag(&'a str),
    /// Everything between tags
    Text(&'a str),
}

impl<'a> Token<'a> {
    /// Raw source slice of this token
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Tag(raw) | Token::Text(raw) => raw,
        }
    }
}

/// Lazy token iterator over a markup string
#[derive(Debug)]
pub struct Tokens<'a> {
    source: &'a str,
    pos: usize,
    tags: Matches<'static, 'a>,
    pending_tag: Option<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Start tokenizing `source`
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            tags: TAG_RE.find_iter(source),
            pending_tag: None,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tag) = self.pending_tag.take() {
            self.pos += tag.len();
            return Some(Token::Tag(tag));
        }

        match self.tags.next() {
            Some(m) if m.start() > self.pos => {
                let text = &self.source[self.pos..m.start()];
                self.pos = m.start();
                self.pending_tag = Some(m.as_str());
                Some(Token::Text(text))
            }
            Some(m) => {
                self.pos = m.end();
                Some(Token::Tag(m.as_str()))
            }
            None if self.pos < self.source.len() => {
                let text = &self.source[self.pos..];
                self.pos = self.source.len();
                Some(Token::Text(text))
            }
            None => None,
        }
    }
}

/// Split markup into tag and text tokens
pub fn tokenize(markup: &str) -> Vec<Token<'_>> {
    Tokens::new(markup).collect()
}

/// Byte ranges of every tag in `markup`, in order
pub fn tag_spans(markup: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    TAG_RE.find_iter(markup).map(|m| m.range())
}

/// Lowercase element name of a tag, if it has one
pub fn tag_name(tag: &str) -> Option<String> {
    TAG_NAME_RE
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Check if a raw tag is a closing tag (`</...>`)
pub fn is_closing_tag(tag: &str) -> bool {
    tag.starts_with("</")
}

/// Smallest decode-atomic piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit<'a> {
    /// Entity reference or single character, as written
    pub raw: &'a str,
    /// Resolved value used for length accounting
    pub decoded: Cow<'a, str>,
}

impl TextUnit<'_> {
    /// Decoded length in characters
    pub fn decoded_len(&self) -> usize {
        self.decoded.chars().count()
    }
}

/// Lazy text unit iterator over a text token
#[derive(Debug, Clone)]
pub struct TextUnits<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TextUnits<'a> {
    /// Start scanning `text`
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for TextUnits<'a> {
    type Item = TextUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let ch = rest.chars().next()?;

        if ch == '&' {
            if let Some(m) = ENTITY_RE.find(rest) {
                let raw = m.as_str();
                self.pos += raw.len();
                return Some(TextUnit {
                    raw,
                    decoded: decode_entity(raw),
                });
            }
        }

        let raw = &rest[..ch.len_utf8()];
        self.pos += raw.len();
        Some(TextUnit {
            raw,
            decoded: Cow::Borrowed(raw),
        })
    }
}

/// Split a text token into characters and entity references
pub fn units_of(text: &str) -> Vec<TextUnit<'_>> {
    TextUnits::new(text).collect()
}

/// Decode one `&...;` reference, falling back to the raw form
pub fn decode_entity(raw: &str) -> Cow<'_, str> {
    let name = raw
        .strip_prefix('&')
        .and_then(|rest| rest.strip_suffix(';'))
        .unwrap_or(raw);

    let decoded = if let Some(number) = name.strip_prefix('#') {
        decode_numeric(number).map(String::from)
    } else if let Some(value) = common_named_entity(name) {
        Some(value.to_string())
    } else {
        decode_with_html_parser(raw)
    };

    match decoded {
        Some(value) => Cow::Owned(value),
        None => Cow::Borrowed(raw),
    }
}

fn decode_numeric(number: &str) -> Option<char> {
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse::<u32>().ok()?,
    };
    char::from_u32(code).filter(|&ch| ch != '\0')
}

// Fast path for the references that dominate book and OCR markup.
fn common_named_entity(name: &str) -> Option<&'static str> {
    let value = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "hellip" => "\u{2026}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "copy" => "\u{a9}",
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_concat(tokens: &[Token<'_>]) -> String {
        tokens.iter().map(Token::raw).collect()
    }

    #[test]
    fn test_tokenize_tags_and_text() {
        let tokens = tokenize("<p>Hello <b>world</b>.</p>");
        assert_eq!(
            tokens,
            vec![
                Token::Tag("<p>"),
                Token::Text("Hello "),
                Token::Tag("<b>"),
                Token::Text("world"),
                Token::Tag("</b>"),
                Token::Text("."),
                Token::Tag("</p>"),
            ]
        );
    }

    #[test]
    fn test_tokenize_plain_text() {
        assert_eq!(tokenize("just text"), vec![Token::Text("just text")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_malformed_markup_degrades_to_text() {
        let input = "a <> b < c <unclosed";
        let tokens = tokenize(input);
        assert_eq!(tokens, vec![Token::Text(input)]);
    }

    #[test]
    fn test_tokenize_tag_spanning_newline() {
        let tokens = tokenize("x<a\nhref=\"y\">z");
        assert_eq!(tokens[1], Token::Tag("<a\nhref=\"y\">"));
    }

    #[test]
    fn test_tokenize_stray_closing_bracket() {
        let input = "1 > 0 <i>ok</i> >";
        let tokens = tokenize(input);
        assert_eq!(raw_concat(&tokens), input);
        assert_eq!(tokens[1], Token::Tag("<i>"));
    }

    #[test]
    fn test_tag_spans() {
        let spans: Vec<_> = tag_spans("a<b>c</b>").collect();
        assert_eq!(spans, vec![1..4, 5..9]);
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name("<P class=\"x\">").as_deref(), Some("p"));
        assert_eq!(tag_name("</ h2 >").as_deref(), Some("h2"));
        assert_eq!(tag_name("<br/>").as_deref(), Some("br"));
        assert_eq!(tag_name("<!-- comment -->"), None);
    }

    #[test]
    fn test_is_closing_tag() {
        assert!(is_closing_tag("</p>"));
        assert!(!is_closing_tag("<p>"));
        assert!(!is_closing_tag("< /p>"));
    }

    #[test]
    fn test_units_of_characters() {
        let units = units_of("añ日");
        let raws: Vec<_> = units.iter().map(|u| u.raw).collect();
        assert_eq!(raws, vec!["a", "ñ", "日"]);
        assert!(units.iter().all(|u| u.decoded == u.raw));
    }

    #[test]
    fn test_units_of_entities() {
        let units = units_of("a&amp;b&rsquo;&#65;&#x42;");
        let pairs: Vec<_> = units
            .iter()
            .map(|u| (u.raw, u.decoded.as_ref()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a", "a"),
                ("&amp;", "&"),
                ("b", "b"),
                ("&rsquo;", "\u{2019}"),
                ("&#65;", "A"),
                ("&#x42;", "B"),
            ]
        );
    }

    #[test]
    fn test_units_of_bare_ampersand() {
        let units = units_of("R&D & co;");
        let raws: Vec<_> = units.iter().map(|u| u.raw).collect();
        assert_eq!(raws.concat(), "R&D & co;");
        assert_eq!(units.len(), "R&D & co;".chars().count());
    }

    #[test]
    fn test_undecodable_entity_keeps_raw_form() {
        let units = units_of("&#xZZ;&#1114112;");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].decoded, "&#xZZ;");
        assert_eq!(units[1].decoded, "&#1114112;");
    }

    #[test]
    fn test_decoded_len_counts_chars() {
        let unit = TextUnit {
            raw: "&nbsp;",
            decoded: decode_entity("&nbsp;"),
        };
        assert_eq!(unit.decoded_len(), 1);
    }

    #[test]
    fn test_named_entity_through_parser() {
        assert_eq!(decode_entity("&eacute;"), "é");
    }
}
