//! Rich-text editing core for pragma.
//!
//! The document is a sequence of typed blocks with per-character inline
//! styles and link entities ([`model`]). It is stored as HTML ([`html`]),
//! edited through pure functions ([`editing`]) and driven by host input
//! through a [`Session`](session::Session).

pub mod editing;
pub mod html;
pub mod model;
pub mod session;

// Re-export key types for easier usage
pub use editing::KeyCommand;
pub use html::{from_html, to_html};
pub use model::{
    BlockKey, BlockType, ContentBlock, ContentState, EditKind, EditorState, InlineStyle,
    SelectionState, StyleSet,
};
pub use session::{Handled, InputEvent, Session, SessionHost};
