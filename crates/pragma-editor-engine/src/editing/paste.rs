//! Clipboard handling.

use crate::editing::links;
use crate::html;
use crate::model::{BlockType, ContentState, EditorState, modifier};

/// Handle a paste. A lone URL becomes a link, HTML is converted and
/// inserted as rich content. `None` means the paste was not handled and
/// the plain text should be inserted by [`paste_plain_text`].
pub fn handle_pasted_text(state: &EditorState, text: &str, html: Option<&str>) -> Option<EditorState> {
    if links::is_url(text) {
        let url = text.trim();
        return Some(if state.selection().is_collapsed() {
            links::create_linked_text(state, url, url)
        } else {
            links::apply_link_to_selection(state, url)
        });
    }

    let fragment = html::from_html(html?);
    if is_blank(&fragment) {
        return None;
    }
    Some(state.insert_fragment(&fragment))
}

/// Insert plain text, one block per line.
pub fn paste_plain_text(state: &EditorState, text: &str) -> EditorState {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if !text.contains('\n') {
        return state.insert_characters(&text);
    }
    state.insert_fragment(&ContentState::from_text(&text))
}

/// Serialize the selected content as HTML, or `None` for a caret.
pub fn copy_html(state: &EditorState) -> Option<String> {
    let selection = state.selection();
    if selection.is_collapsed() {
        return None;
    }
    let fragment = modifier::get_fragment(state.content(), selection);
    Some(html::to_html(&fragment))
}

fn is_blank(fragment: &ContentState) -> bool {
    !fragment.has_text()
        && fragment.block_count() == 1
        && fragment.first_block().kind() == BlockType::Unstyled
}
