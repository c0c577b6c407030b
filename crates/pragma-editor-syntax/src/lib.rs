//! # pragma-editor-syntax
//!
//! A forgiving HTML tokenizer built on [Logos], used by the pragma editor to
//! read the HTML it stores notes in.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Event builder → HtmlEvents
//!               (Logos)          (tag parsing, entity decoding)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Splits input into start tags, end tags, declarations and text. Every byte
//! ends up in exactly one token, so there is no input the lexer rejects.
//!
//! ### 2. Tags ([`tag`] module)
//!
//! Turns the raw text of a tag into a lowercased name and its attributes,
//! decoding character references in attribute values.
//!
//! ### 3. Events ([`event`] module)
//!
//! Produces a flat list of [`HtmlEvent`]s. There is no tree: the editor's
//! HTML codec keeps its own element stack and decides how to recover from
//! mis-nested markup.
//!
//! ## Quick Start
//!
//! ```
//! use pragma_editor_syntax::{HtmlEvent, parse};
//!
//! let events = parse("<p>Fish &amp; chips</p>");
//!
//! assert_eq!(events.len(), 3);
//! assert_eq!(events[1], HtmlEvent::Text("Fish & chips".to_string()));
//! ```

pub mod event;
pub mod lexer;
pub mod tag;

pub use event::{HtmlEvent, parse};
pub use tag::{Attribute, Tag};
