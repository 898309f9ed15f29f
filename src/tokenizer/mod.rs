//! # Markup Tokenizer
//!
//! Splits a markup document into the flat element stream the filter
//! pipeline consumes: tags on one side, everything else (text, comments,
//! doctypes, processing instructions) as opaque raw segments.
//!
//! This is a template tokenizer, not a browser parser. It is deliberately
//! lenient where hand-written templates are sloppy — a stray `<` is text, an
//! unterminated `<script>` swallows the rest of the document — and strict
//! only where ambiguity would corrupt the component structure (unterminated
//! comments and attribute values are errors). Entities are not decoded; raw
//! segments pass through byte-for-byte. Tag and attribute names are
//! constrained to ASCII `[A-Za-z0-9:_-]`, with the namespace split at the
//! first `:`.
//!
//! Anything that produces [`MarkupElement`]s can feed the parser through the
//! [`TagSource`] trait; [`Tokenizer`] is the bundled implementation.

use crate::markup::{ComponentTag, MarkupElement, MarkupError, TagKind};
use memchr::{memchr, memchr_iter, memmem};

/// A source of markup elements. The parser pulls from one of these until it
/// returns `Ok(None)`.
pub trait TagSource {
    /// Produce the next element, or `Ok(None)` at end of input.
    fn next_element(&mut self) -> Result<Option<MarkupElement>, MarkupError>;
}

/// Tag names whose content is script data, not markup: a `<` inside them
/// does not open a tag until the matching close tag appears.
const RAWTEXT_ELEMENTS: &[&str] = &["script", "style"];

/// The bundled [`TagSource`]: scans a borrowed document with `memchr` and
/// tracks 1-based line/column positions (in bytes) for error reporting.
pub struct Tokenizer<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
    /// Set after an open `<script>`/`<style>`: the next scan looks for the
    /// matching close tag instead of tokenizing the content.
    rawtext: Option<String>,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            text: source,
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            rawtext: None,
        }
    }

    /// Current position as (line, column), both 1-based.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn advance(&mut self, to: usize) {
        let consumed = &self.src[self.pos..to];
        let mut last_newline = None;
        let mut count = 0;
        for idx in memchr_iter(b'\n', consumed) {
            last_newline = Some(idx);
            count += 1;
        }
        match last_newline {
            Some(idx) => {
                self.line += count;
                self.column = consumed.len() - idx;
            }
            None => self.column += consumed.len(),
        }
        self.pos = to;
    }

    fn raw_to(&mut self, end: usize) -> MarkupElement {
        let text = self.text[self.pos..end].to_string();
        self.advance(end);
        MarkupElement::Raw(text)
    }

    /// Scan for the close tag of a rawtext element. Returns the content as a
    /// raw segment, or `None` when the scan lands directly on the close tag.
    fn rawtext_content(&mut self, name: &str) -> Option<MarkupElement> {
        let close = format!("</{}", name);
        let end = find_ascii_ci(&self.src[self.pos..], close.as_bytes())
            .map(|off| self.pos + off)
            .unwrap_or(self.src.len());
        if end > self.pos {
            Some(self.raw_to(end))
        } else {
            None
        }
    }

    fn next_tag(&mut self) -> Result<MarkupElement, MarkupError> {
        let rest = &self.src[self.pos..];
        if rest.starts_with(b"<!--") {
            return match memmem::find(&self.src[self.pos + 4..], b"-->") {
                Some(off) => Ok(self.raw_to(self.pos + 4 + off + 3)),
                None => Err(MarkupError::syntax(
                    self.line,
                    self.column,
                    "unterminated comment",
                )),
            };
        }
        if rest.starts_with(b"<!") || rest.starts_with(b"<?") {
            // Doctype, CDATA, processing instruction: opaque up to '>'
            return match memchr(b'>', &self.src[self.pos + 2..]) {
                Some(off) => Ok(self.raw_to(self.pos + 2 + off + 1)),
                None => Err(MarkupError::syntax(
                    self.line,
                    self.column,
                    "unterminated markup declaration",
                )),
            };
        }
        if rest.starts_with(b"</") {
            return self.parse_close_tag();
        }
        if rest.len() >= 2 && rest[1].is_ascii_alphabetic() {
            return self.parse_open_tag();
        }
        // Stray '<' that opens nothing: treat it as text, like browsers do.
        let end = memchr(b'<', &self.src[self.pos + 1..])
            .map(|off| self.pos + 1 + off)
            .unwrap_or(self.src.len());
        Ok(self.raw_to(end))
    }

    fn parse_open_tag(&mut self) -> Result<MarkupElement, MarkupError> {
        let (tag_line, tag_column) = (self.line, self.column);
        let len = self.src.len();
        let mut i = self.pos + 1;
        let name_start = i;
        while i < len && is_name_byte(self.src[i]) {
            i += 1;
        }
        let (namespace, name) = split_namespace(&self.text[name_start..i]);
        let mut tag = ComponentTag::new(name.to_ascii_lowercase(), TagKind::Open);
        tag.namespace = namespace.map(|ns| ns.to_ascii_lowercase());
        tag.line = tag_line;
        tag.column = tag_column;

        loop {
            while i < len && self.src[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= len {
                return Err(MarkupError::syntax(tag_line, tag_column, "unterminated tag"));
            }
            match self.src[i] {
                b'>' => {
                    i += 1;
                    break;
                }
                b'/' => {
                    if i + 1 >= len || self.src[i + 1] != b'>' {
                        return Err(MarkupError::syntax(
                            tag_line,
                            tag_column,
                            "malformed self-closing tag",
                        ));
                    }
                    tag.kind = TagKind::OpenClose;
                    i += 2;
                    break;
                }
                b if is_name_byte(b) => {
                    let attr_start = i;
                    while i < len && is_name_byte(self.src[i]) {
                        i += 1;
                    }
                    let attr_name = self.text[attr_start..i].to_string();
                    while i < len && self.src[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    let value = if i < len && self.src[i] == b'=' {
                        i += 1;
                        while i < len && self.src[i].is_ascii_whitespace() {
                            i += 1;
                        }
                        if i < len && (self.src[i] == b'"' || self.src[i] == b'\'') {
                            let quote = self.src[i];
                            let value_start = i + 1;
                            match memchr(quote, &self.src[value_start..]) {
                                Some(off) => {
                                    let value = self.text[value_start..value_start + off].to_string();
                                    i = value_start + off + 1;
                                    value
                                }
                                None => {
                                    return Err(MarkupError::syntax(
                                        tag_line,
                                        tag_column,
                                        format!("unterminated value for attribute '{}'", attr_name),
                                    ));
                                }
                            }
                        } else {
                            // Unquoted values run to whitespace or '>', '/'
                            // included, per the HTML parsing rules.
                            let value_start = i;
                            while i < len
                                && !self.src[i].is_ascii_whitespace()
                                && self.src[i] != b'>'
                            {
                                i += 1;
                            }
                            self.text[value_start..i].to_string()
                        }
                    } else {
                        // Boolean attribute: present, no value
                        String::new()
                    };
                    tag.attributes.push((attr_name, value));
                }
                other => {
                    return Err(MarkupError::syntax(
                        tag_line,
                        tag_column,
                        format!("unexpected character '{}' in tag", other as char),
                    ));
                }
            }
        }

        if tag.kind == TagKind::Open
            && tag.namespace.is_none()
            && RAWTEXT_ELEMENTS.contains(&tag.name.as_str())
        {
            self.rawtext = Some(tag.name.clone());
        }
        self.advance(i);
        Ok(MarkupElement::Tag(tag))
    }

    fn parse_close_tag(&mut self) -> Result<MarkupElement, MarkupError> {
        let (tag_line, tag_column) = (self.line, self.column);
        let len = self.src.len();
        let mut i = self.pos + 2;
        if i >= len || !self.src[i].is_ascii_alphabetic() {
            return Err(MarkupError::syntax(tag_line, tag_column, "malformed close tag"));
        }
        let name_start = i;
        while i < len && is_name_byte(self.src[i]) {
            i += 1;
        }
        let (namespace, name) = split_namespace(&self.text[name_start..i]);
        while i < len && self.src[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len || self.src[i] != b'>' {
            return Err(MarkupError::syntax(tag_line, tag_column, "malformed close tag"));
        }
        i += 1;
        let mut tag = ComponentTag::new(name.to_ascii_lowercase(), TagKind::Close);
        tag.namespace = namespace.map(|ns| ns.to_ascii_lowercase());
        tag.line = tag_line;
        tag.column = tag_column;
        self.advance(i);
        Ok(MarkupElement::Tag(tag))
    }
}

impl TagSource for Tokenizer<'_> {
    fn next_element(&mut self) -> Result<Option<MarkupElement>, MarkupError> {
        if let Some(name) = self.rawtext.take() {
            if let Some(content) = self.rawtext_content(&name) {
                return Ok(Some(content));
            }
        }
        if self.pos >= self.src.len() {
            return Ok(None);
        }
        match memchr(b'<', &self.src[self.pos..]) {
            None => Ok(Some(self.raw_to(self.src.len()))),
            Some(0) => self.next_tag().map(Some),
            Some(off) => Ok(Some(self.raw_to(self.pos + off))),
        }
    }
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b':' || b == b'_' || b == b'-'
}

/// Split `prefix:rest` at the first colon. Empty prefix or rest means no
/// namespace.
fn split_namespace(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, rest)) if !prefix.is_empty() && !rest.is_empty() => (Some(prefix), rest),
        _ => (None, raw),
    }
}

/// Case-insensitive ASCII substring search.
fn find_ascii_ci(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    let first = needle[0];
    // Close-tag needles start with '<', which has no case to fold.
    for candidate in memchr_iter(first, haystack) {
        if candidate + needle.len() > haystack.len() {
            return None;
        }
        if haystack[candidate..candidate + needle.len()].eq_ignore_ascii_case(needle) {
            return Some(candidate);
        }
    }
    None
}
