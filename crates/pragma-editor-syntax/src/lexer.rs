//! # Lexer - Tokenizing HTML Source
//!
//! This module provides the first stage of reading HTML: breaking source text
//! into tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! which keeps the tokenizer total: malformed markup degrades into text
//! tokens instead of errors.
//!
//! ```
//! use pragma_editor_syntax::lexer::lex;
//!
//! let input = "<p class=\"x\">Hello <b>world</b></p>";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer only knows where a tag starts and ends
//! (honouring quoted attribute values, which may contain `>`); turning the tag
//! text into a name and attributes is the job of [`crate::tag`].

use logos::{Lexer, Logos};

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!-- comment -->`, `<!DOCTYPE html>`, `<![CDATA[...]]>`
    #[token("<!", lex_declaration)]
    Declaration,

    /// `<?xml ...?>` processing instructions
    #[token("<?", lex_processing_instruction)]
    ProcessingInstruction,

    /// `<name attr="value">` or `<name/>`
    #[regex(r"<[A-Za-z]", lex_tag)]
    StartTag,

    /// `</name>`
    #[regex(r"</[A-Za-z]", lex_tag)]
    EndTag,

    /// A `<` that does not open any markup
    #[token("<")]
    Lt,

    /// Character data between markup
    #[regex(r"[^<]+")]
    Text,
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        // Logos error means an unrecognized sequence - treat as text
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

/// Consume a tag body up to and including the closing `>`.
///
/// Quotes only count when they open an attribute value (directly after `=`),
/// so apostrophes in unquoted values don't swallow the rest of the document.
/// An unterminated tag runs to the end of input.
fn lex_tag(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let mut quote: Option<char> = None;
    let mut after_equals = false;

    for (index, c) in rest.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '>' => {
                lex.bump(index + 1);
                return true;
            }
            '"' | '\'' if after_equals => quote = Some(c),
            _ => {}
        }
        if c == '=' {
            after_equals = true;
        } else if !c.is_whitespace() {
            after_equals = false;
        }
    }

    lex.bump(rest.len());
    true
}

fn lex_declaration(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let consumed = if let Some(body) = rest.strip_prefix("--") {
        body.find("-->").map(|end| 2 + end + 3)
    } else if let Some(body) = rest.strip_prefix("[CDATA[") {
        body.find("]]>").map(|end| 7 + end + 3)
    } else {
        rest.find('>').map(|end| end + 1)
    };
    lex.bump(consumed.unwrap_or(rest.len()));
    true
}

fn lex_processing_instruction(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    lex.bump(rest.find('>').map(|end| end + 1).unwrap_or(rest.len()));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_paragraph() {
        assert_eq!(
            kinds("<p>Hello</p>"),
            vec![TokenKind::StartTag, TokenKind::Text, TokenKind::EndTag]
        );
    }

    #[test]
    fn test_quoted_gt_stays_inside_tag() {
        let tokens = lex(r#"<a href="x>y">link</a>"#);
        assert_eq!(tokens[0].text, r#"<a href="x>y">"#);
        assert_eq!(tokens[1].text, "link");
    }

    #[test]
    fn test_apostrophe_in_unquoted_value_does_not_open_quote() {
        let tokens = lex("<a title=don't>x</a>");
        assert_eq!(tokens[0].text, "<a title=don't>");
        assert_eq!(tokens[1].kind, TokenKind::Text);
    }

    #[test]
    fn test_comment_may_contain_markup() {
        let tokens = lex("a<!-- <b>not bold</b> -->c");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Text, TokenKind::Declaration, TokenKind::Text]
        );
        assert_eq!(tokens[1].text, "<!-- <b>not bold</b> -->");
    }

    #[test]
    fn test_stray_less_than_is_its_own_token() {
        assert_eq!(
            kinds("1 < 2"),
            vec![TokenKind::Text, TokenKind::Lt, TokenKind::Text]
        );
    }

    #[rstest]
    #[case("")]
    #[case("plain text only")]
    #[case("<p>unterminated")]
    #[case("<p class=\"unterminated")]
    #[case("<!-- never closed")]
    #[case("<!DOCTYPE html><html><body><p>x</p></body></html>")]
    #[case("<?xml version=\"1.0\"?><br/>")]
    #[case("< p>not a tag</ p>")]
    #[case("日本語 <mark>テキスト</mark> 🦀")]
    fn test_lexing_is_lossless(#[case] input: &str) {
        let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(reconstructed, input);
    }

    #[test]
    fn test_spans_cover_input() {
        let input = "<ul><li>a</li></ul>";
        let mut expected_start = 0;
        for (token, span) in lex_with_spans(input) {
            assert_eq!(span.start, expected_start);
            assert_eq!(&input[span.clone()], token.text);
            expected_start = span.end;
        }
        assert_eq!(expected_start, input.len());
    }
}
