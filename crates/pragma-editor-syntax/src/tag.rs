//! Tag text to name + attributes.
//!
//! Input is the raw slice of a [`TokenKind::StartTag`] or
//! [`TokenKind::EndTag`] token. Parsing never fails: anything odd inside a
//! tag is dropped or folded into the nearest attribute.
//!
//! [`TokenKind::StartTag`]: crate::lexer::TokenKind::StartTag
//! [`TokenKind::EndTag`]: crate::lexer::TokenKind::EndTag

use std::borrow::Cow;

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A single attribute. `value` is `None` for bare attributes like `checked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// A parsed start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased element name
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Written as `<name ... />`
    pub self_closing: bool,
}

impl Tag {
    /// Parse the raw text of a start tag (`<name attr=value ...>`).
    pub fn parse(raw: &str) -> Self {
        let inner = raw.strip_prefix('<').unwrap_or(raw);
        let inner = inner.strip_suffix('>').unwrap_or(inner);
        let (inner, self_closing) = match inner.trim_end().strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (inner, false),
        };

        let name_end = inner
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(inner.len());
        let name = inner[..name_end].to_ascii_lowercase();
        let attributes = parse_attributes(&inner[name_end..]);

        Self {
            name,
            attributes,
            self_closing,
        }
    }

    /// Look up an attribute by (case-insensitive) name. First occurrence wins.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Value of an attribute; a bare attribute yields `Some("")`.
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name)
            .map(|attribute| attribute.value.as_deref().unwrap_or(""))
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.contains(&self.name.as_str())
    }
}

/// Extract the lowercased element name from the raw text of an end tag.
pub fn end_tag_name(raw: &str) -> String {
    let inner = raw.strip_prefix("</").unwrap_or(raw);
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(inner.len());
    inner[..end].to_ascii_lowercase()
}

fn parse_attributes(mut input: &str) -> Vec<Attribute> {
    let mut attributes = Vec::new();

    loop {
        input = input.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if input.is_empty() {
            break;
        }

        let name_end = input
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(input.len());
        if name_end == 0 {
            // A dangling `=` with no attribute name
            input = &input[1..];
            continue;
        }
        let name = input[..name_end].to_ascii_lowercase();
        input = input[name_end..].trim_start();

        let value = match input.strip_prefix('=') {
            Some(rest) => {
                let (raw, remaining) = split_value(rest.trim_start());
                input = remaining;
                Some(decode(raw).into_owned())
            }
            None => None,
        };

        attributes.push(Attribute { name, value });
    }

    attributes
}

/// Split `input` into an attribute value and whatever follows it.
fn split_value(input: &str) -> (&str, &str) {
    match input.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &input[1..];
            match body.find(quote) {
                Some(end) => (&body[..end], &body[end + 1..]),
                None => (body, ""),
            }
        }
        _ => {
            let end = input.find(char::is_whitespace).unwrap_or(input.len());
            (&input[..end], &input[end..])
        }
    }
}

fn decode(raw: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(raw)
}
