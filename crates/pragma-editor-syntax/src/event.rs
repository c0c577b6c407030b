//! Token stream to flat HTML events.
//!
//! The event stream is deliberately flat: no tree is built and end tags are
//! not matched against start tags. Consumers keep their own element stack,
//! which lets them decide how forgiving to be about mis-nested markup.

use crate::lexer::{TokenKind, lex_with_spans};
use crate::tag::{Tag, end_tag_name};

/// One step of an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlEvent {
    /// A start tag. Void and self-closing tags have no matching `End`.
    Start(Tag),
    /// An end tag, by lowercased name.
    End(String),
    /// Character data with entities already decoded. Consecutive text is
    /// merged into a single event. Inside `<script>`/`<style>` the text is
    /// passed through verbatim.
    Text(String),
}

/// Parse HTML into a flat event stream. Never fails.
///
/// Comments, doctypes and processing instructions produce no events.
pub fn parse(html: &str) -> Vec<HtmlEvent> {
    let mut events = Vec::new();
    let mut pending = String::new();
    let mut rest = html;

    'input: while !rest.is_empty() {
        for (token, span) in lex_with_spans(rest) {
            match token.kind {
                TokenKind::Text | TokenKind::Lt => pending.push_str(token.text),
                TokenKind::Declaration | TokenKind::ProcessingInstruction => {}
                TokenKind::StartTag => {
                    flush_text(&mut pending, &mut events);
                    let tag = Tag::parse(token.text);
                    if tag.is_raw_text() && !tag.self_closing {
                        // Raw text can contain anything that looks like markup,
                        // so cut it out of the input and re-lex what follows.
                        let name = tag.name.clone();
                        events.push(HtmlEvent::Start(tag));
                        let body = &rest[span.end..];
                        match find_raw_text_end(body, &name) {
                            Some((content_end, close_end)) => {
                                push_raw(&body[..content_end], &mut events);
                                events.push(HtmlEvent::End(name));
                                rest = &body[close_end..];
                            }
                            None => {
                                push_raw(body, &mut events);
                                rest = "";
                            }
                        }
                        continue 'input;
                    }
                    events.push(HtmlEvent::Start(tag));
                }
                TokenKind::EndTag => {
                    flush_text(&mut pending, &mut events);
                    events.push(HtmlEvent::End(end_tag_name(token.text)));
                }
            }
        }
        break;
    }

    flush_text(&mut pending, &mut events);
    events
}

/// Locate `</name ...>` in `body`, case-insensitively.
///
/// Returns the byte offset where the raw content ends and the offset just
/// past the closing tag.
fn find_raw_text_end(body: &str, name: &str) -> Option<(usize, usize)> {
    // ASCII lowercasing keeps byte offsets intact
    let lowered = body.to_ascii_lowercase();
    let needle = format!("</{name}");
    let mut from = 0;
    while let Some(found) = lowered[from..].find(&needle) {
        let content_end = from + found;
        let after_name = content_end + needle.len();
        let boundary = lowered[after_name..].chars().next();
        if matches!(boundary, None | Some('>' | '/')) || boundary.is_some_and(char::is_whitespace) {
            let close_end = lowered[after_name..]
                .find('>')
                .map(|gt| after_name + gt + 1)
                .unwrap_or(body.len());
            return Some((content_end, close_end));
        }
        from = after_name;
    }
    None
}

fn push_raw(raw: &str, events: &mut Vec<HtmlEvent>) {
    if !raw.is_empty() {
        events.push(HtmlEvent::Text(raw.to_string()));
    }
}

fn flush_text(pending: &mut String, events: &mut Vec<HtmlEvent>) {
    if pending.is_empty() {
        return;
    }
    let decoded = html_escape::decode_html_entities(pending.as_str()).into_owned();
    pending.clear();
    events.push(HtmlEvent::Text(decoded));
}
