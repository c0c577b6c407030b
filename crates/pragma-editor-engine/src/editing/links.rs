//! Hyperlink entities.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{EditKind, EditorState, Entity, StyleSet, modifier};

/// Whether `text`, ignoring surrounding whitespace, is a single absolute
/// `http`, `https`, `ftp` or `mailto` URL.
pub fn is_url(text: &str) -> bool {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let url_regex = URL_REGEX.get_or_init(|| {
        Regex::new(r"^(?i:(?:https?|ftp)://[^\s/?#]+[^\s]*|mailto:[^\s@]+@[^\s@]+)$")
            .expect("Invalid URL regex")
    });
    url_regex.is_match(text.trim())
}

/// Link the selected text to `url`, keeping the text as it is.
pub fn apply_link_to_selection(state: &EditorState, url: &str) -> EditorState {
    let (content, key) = modifier::create_entity(state.content(), Entity::link(url));
    let content = modifier::apply_entity(&content, state.selection(), Some(key));
    state.push(content, *state.selection(), EditKind::ApplyEntity)
}

/// Insert `text` linked to `url` at the selection and put the caret after it.
pub fn create_linked_text(state: &EditorState, url: &str, text: &str) -> EditorState {
    let (content, key) = modifier::create_entity(state.content(), Entity::link(url));
    let (content, caret) =
        modifier::insert_text(&content, state.selection(), text, StyleSet::EMPTY, Some(key));
    state.push(content, caret, EditKind::InsertCharacters)
}

/// Unlink the selected text. A caret is left alone.
pub fn remove_link(state: &EditorState) -> EditorState {
    if state.selection().is_collapsed() {
        return state.clone();
    }
    let content = modifier::apply_entity(state.content(), state.selection(), None);
    state.push(content, *state.selection(), EditKind::ApplyEntity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentState, Mutability};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com", true)]
    #[case("  http://example.com/a?b=c#d \n", true)]
    #[case("HTTPS://EXAMPLE.COM", true)]
    #[case("ftp://files.example.org/pub", true)]
    #[case("mailto:someone@example.com", true)]
    #[case("example.com", false)]
    #[case("https://", false)]
    #[case("see https://example.com", false)]
    #[case("https://example.com and more", false)]
    #[case("javascript:alert(1)", false)]
    #[case("", false)]
    fn test_is_url(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_url(text), expected);
    }

    #[test]
    fn test_apply_link_keeps_text() {
        let content = ContentState::from_text("click me");
        let key = content.first_block().key();
        let state = EditorState::create_with_content(content.clone())
            .force_selection(content.select((key, 6), (key, 8)));

        let linked = apply_link_to_selection(&state, "https://example.com");

        let block = linked.content().first_block();
        assert_eq!(block.text(), "click me");
        let ranges = block.entity_ranges();
        assert_eq!(ranges.len(), 1);
        assert_eq!((ranges[0].offset, ranges[0].length), (6, 2));
        let entity = linked.content().entity(ranges[0].key).unwrap();
        assert_eq!(entity.url(), Some("https://example.com"));
        assert_eq!(entity.mutability(), Mutability::Mutable);
        assert_eq!(linked.last_edit_kind(), Some(EditKind::ApplyEntity));
    }

    #[test]
    fn test_create_linked_text_moves_caret_after_it() {
        let content = ContentState::from_text("ab");
        let key = content.first_block().key();
        let state = EditorState::create_with_content(content)
            .force_selection(crate::model::SelectionState::collapsed(key, 1));

        let linked = create_linked_text(&state, "https://x.example", "LINK");

        let block = linked.content().first_block();
        assert_eq!(block.text(), "aLINKb");
        assert_eq!(block.entity_ranges().len(), 1);
        assert_eq!(block.entity_at(0), None);
        assert!(block.entity_at(1).is_some());
        assert_eq!(block.entity_at(5), None);
        assert_eq!(linked.selection().start_offset(), 5);
        assert!(linked.selection().is_collapsed());
    }

    #[test]
    fn test_remove_link() {
        let content = ContentState::from_text("link");
        let key = content.first_block().key();
        let state = EditorState::create_with_content(content.clone())
            .force_selection(content.select((key, 0), (key, 4)));
        let linked = apply_link_to_selection(&state, "https://example.com");

        let unlinked = remove_link(&linked);

        assert!(unlinked.content().first_block().entity_ranges().is_empty());
        let caret = unlinked.force_selection(crate::model::SelectionState::collapsed(key, 2));
        assert!(remove_link(&caret).content().is_same_revision(caret.content()));
    }
}
