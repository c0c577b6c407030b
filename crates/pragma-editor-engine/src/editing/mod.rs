//! Editing behaviour layered over [`EditorState`](crate::model::EditorState).
//!
//! Every function here is pure: it takes a state and returns the state to
//! adopt, or `None` when it does not apply so the caller can fall back to
//! the default editing behaviour.

pub mod commands;
pub mod links;
pub mod list_behavior;
pub mod paste;

pub use commands::{
    KeyCommand, apply_default_key_command, current_block_type, handle_key_command,
    toggle_block_type, toggle_code, toggle_inline_style,
};
pub use links::{apply_link_to_selection, create_linked_text, is_url, remove_link};
pub use list_behavior::BackspaceOutcome;
pub use paste::{copy_html, handle_pasted_text, paste_plain_text};
