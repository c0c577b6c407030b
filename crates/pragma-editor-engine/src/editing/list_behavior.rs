//! Return, backspace and tab on list items.
//!
//! All functions are pure: they take the current state and return the state
//! to adopt, or report that they do not apply so the caller can fall back
//! to default editing.

use pragma_editor_config::BackspacePolicy;

use crate::editing::commands;
use crate::model::{
    BlockData, BlockKey, BlockType, ContentBlock, DataValue, EditKind, EditorState, modifier,
};

/// Result of running backspace through the list rules.
#[derive(Debug, Clone)]
pub enum BackspaceOutcome {
    /// Adopt this state
    Edit(EditorState),
    /// Ask the host to delete across editors; the key is consumed
    DeleteIntent,
    NotHandled,
}

pub fn is_empty_list_item(block: &ContentBlock) -> bool {
    block.kind().is_list_item() && block.is_empty()
}

/// Return in an empty list item steps out of the list: outdent one level,
/// or at the top level turn the item into a paragraph. The block keeps its
/// key. `None` when the selection is not in an empty list item.
pub fn on_return(state: &EditorState) -> Option<EditorState> {
    let block = state.start_block();
    if !is_empty_list_item(block) {
        return None;
    }

    let selection = *state.selection();
    if block.depth() > 0 {
        let content = modifier::set_block_depth(state.content(), block.key(), block.depth() - 1);
        Some(state.push(content, selection, EditKind::AdjustDepth))
    } else {
        let caret = selection.collapse_to_start();
        let content = modifier::set_block_type(state.content(), &caret, BlockType::Unstyled);
        Some(state.push(content, selection, EditKind::ChangeBlockType))
    }
}

/// Backspace with a caret.
///
/// In an empty list item it behaves like return. At the very start of the
/// document the policy decides: `Inline` strips the block style, while
/// `DelegateToHost` hands the deletion to the host. Anywhere else it is
/// left to default text deletion.
pub fn on_backspace(state: &EditorState, policy: BackspacePolicy) -> BackspaceOutcome {
    if !state.selection().is_collapsed() {
        return BackspaceOutcome::NotHandled;
    }

    if let Some(next) = on_return(state) {
        return BackspaceOutcome::Edit(next);
    }

    if commands::is_selection_at_start(state) {
        return match policy {
            BackspacePolicy::Inline => match commands::try_to_remove_block_style(state) {
                Some(next) => BackspaceOutcome::Edit(next),
                None => BackspaceOutcome::NotHandled,
            },
            BackspacePolicy::DelegateToHost => BackspaceOutcome::DeleteIntent,
        };
    }

    BackspaceOutcome::NotHandled
}

/// Tab indents and shift-tab outdents the list item holding the selection.
///
/// Only applies when the selection stays within one list item. Indenting
/// past `max_depth` and outdenting below 0 are declined. An ordered or
/// unordered item is only indented under a list item directly above it,
/// and at most one level deeper than that item.
pub fn on_tab(state: &EditorState, shift: bool, max_depth: u8) -> Option<EditorState> {
    on_checkable_tab(state, shift, max_depth).or_else(|| on_list_tab(state, shift, max_depth))
}

fn on_checkable_tab(state: &EditorState, shift: bool, max_depth: u8) -> Option<EditorState> {
    adjust_depth(state, shift, max_depth, |kind| {
        kind == BlockType::CheckableListItem
    })
}

fn on_list_tab(state: &EditorState, shift: bool, max_depth: u8) -> Option<EditorState> {
    let max_depth = if shift {
        max_depth
    } else {
        let above = state
            .content()
            .block_before(state.start_block().key())
            .filter(|above| above.kind().is_list_item())?;
        max_depth.min(above.depth().saturating_add(1))
    };
    adjust_depth(state, shift, max_depth, |kind| {
        matches!(kind, BlockType::UnorderedListItem | BlockType::OrderedListItem)
    })
}

fn adjust_depth(
    state: &EditorState,
    shift: bool,
    max_depth: u8,
    applies_to: impl Fn(BlockType) -> bool,
) -> Option<EditorState> {
    let selection = state.selection();
    if !selection.is_single_block() {
        return None;
    }
    let block = state.start_block();
    if !applies_to(block.kind()) {
        return None;
    }
    let blocked = if shift {
        block.depth() == 0
    } else {
        block.depth() >= max_depth
    };
    if blocked {
        return None;
    }

    let delta = if shift { -1 } else { 1 };
    let content = modifier::adjust_block_depth(state.content(), selection, delta, max_depth);
    Some(state.push(content, *selection, EditKind::AdjustDepth))
}

/// Flip the `checked` flag of a checkable item. Other blocks are returned
/// unchanged.
///
/// # Panics
/// If `key` is unknown.
pub fn toggle_checked(state: &EditorState, key: BlockKey) -> EditorState {
    let block = state.content().block(key);
    if block.kind() != BlockType::CheckableListItem {
        return state.clone();
    }
    let checked = !block.data().is_checked();
    let data = block
        .data()
        .clone()
        .with(BlockData::CHECKED, DataValue::Bool(checked));
    let content = modifier::set_block_data(state.content(), key, data);
    state.push(content, *state.selection(), EditKind::ChangeBlockData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentState, SelectionState};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn caret_in(block: ContentBlock, offset: usize) -> EditorState {
        let key = block.key();
        let content = ContentState::from_blocks(vec![
            ContentBlock::new(BlockType::Unstyled, "before"),
            block,
        ]);
        EditorState::create_with_content(content).force_selection(SelectionState::collapsed(key, offset))
    }

    #[rstest]
    #[case(BlockType::UnorderedListItem)]
    #[case(BlockType::OrderedListItem)]
    #[case(BlockType::CheckableListItem)]
    fn test_return_in_empty_top_level_item_leaves_list(#[case] kind: BlockType) {
        let block = ContentBlock::empty(kind);
        let key = block.key();
        let state = caret_in(block, 0);

        let next = on_return(&state).unwrap();

        let block = next.content().block(key);
        assert_eq!(block.kind(), BlockType::Unstyled);
        assert_eq!(block.text(), "");
        assert_eq!(next.content().block_count(), 2);
    }

    #[test]
    fn test_return_in_empty_nested_item_outdents() {
        let block = ContentBlock::empty(BlockType::OrderedListItem).with_depth(2);
        let key = block.key();
        let state = caret_in(block, 0);

        let next = on_return(&state).unwrap();

        let block = next.content().block(key);
        assert_eq!(block.kind(), BlockType::OrderedListItem);
        assert_eq!(block.depth(), 1);
        assert_eq!(next.last_edit_kind(), Some(EditKind::AdjustDepth));
    }

    #[rstest]
    #[case::non_empty_item(ContentBlock::new(BlockType::UnorderedListItem, "x"))]
    #[case::empty_paragraph(ContentBlock::empty(BlockType::Unstyled))]
    #[case::empty_heading(ContentBlock::empty(BlockType::HeaderOne))]
    fn test_return_declines_elsewhere(#[case] block: ContentBlock) {
        assert!(on_return(&caret_in(block, 0)).is_none());
    }

    #[test]
    fn test_backspace_in_empty_item_matches_return() {
        let block = ContentBlock::empty(BlockType::UnorderedListItem).with_depth(1);
        let state = caret_in(block, 0);

        let BackspaceOutcome::Edit(next) = on_backspace(&state, BackspacePolicy::Inline) else {
            panic!("expected an edit");
        };

        assert_eq!(next.content(), on_return(&state).unwrap().content());
    }

    #[test]
    fn test_backspace_mid_item_is_not_handled() {
        let state = caret_in(ContentBlock::new(BlockType::UnorderedListItem, "abc"), 0);

        assert!(matches!(
            on_backspace(&state, BackspacePolicy::Inline),
            BackspaceOutcome::NotHandled
        ));
    }

    #[test]
    fn test_backspace_at_document_start_follows_policy() {
        let content = ContentState::from_blocks(vec![ContentBlock::new(BlockType::Blockquote, "q")]);
        let state = EditorState::create_with_content(content.clone())
            .force_selection(content.selection_at_start());

        let BackspaceOutcome::Edit(next) = on_backspace(&state, BackspacePolicy::Inline) else {
            panic!("expected an edit");
        };
        assert_eq!(next.start_block().kind(), BlockType::Unstyled);

        assert!(matches!(
            on_backspace(&state, BackspacePolicy::DelegateToHost),
            BackspaceOutcome::DeleteIntent
        ));
    }

    #[test]
    fn test_backspace_at_start_of_plain_document_is_not_handled_inline() {
        let content = ContentState::from_text("plain");
        let state = EditorState::create_with_content(content.clone())
            .force_selection(content.selection_at_start());

        assert!(matches!(
            on_backspace(&state, BackspacePolicy::Inline),
            BackspaceOutcome::NotHandled
        ));
    }

    #[test]
    fn test_backspace_with_range_is_not_handled() {
        let state = caret_in(ContentBlock::new(BlockType::UnorderedListItem, "abc"), 0);
        let key = state.start_block().key();
        let ranged = state.force_selection(state.content().select((key, 0), (key, 2)));

        assert!(matches!(
            on_backspace(&ranged, BackspacePolicy::DelegateToHost),
            BackspaceOutcome::NotHandled
        ));
    }

    fn caret_below(above: ContentBlock, block: ContentBlock) -> EditorState {
        let key = block.key();
        let content = ContentState::from_blocks(vec![above, block]);
        EditorState::create_with_content(content).force_selection(SelectionState::collapsed(key, 2))
    }

    #[rstest]
    #[case::indent(BlockType::UnorderedListItem, 0, 0, false, Some(1))]
    #[case::outdent(BlockType::OrderedListItem, 1, 2, true, Some(1))]
    #[case::one_deeper_than_above(BlockType::UnorderedListItem, 0, 1, false, None)]
    #[case::under_deeper_item(BlockType::OrderedListItem, 3, 1, false, Some(2))]
    #[case::at_max(BlockType::UnorderedListItem, 4, 4, false, None)]
    #[case::checkable_indent(BlockType::CheckableListItem, 0, 3, false, Some(4))]
    #[case::at_zero(BlockType::CheckableListItem, 0, 0, true, None)]
    fn test_tab_under_list_item(
        #[case] kind: BlockType,
        #[case] above_depth: u8,
        #[case] depth: u8,
        #[case] shift: bool,
        #[case] expected: Option<u8>,
    ) {
        let above = ContentBlock::new(BlockType::UnorderedListItem, "above").with_depth(above_depth);
        let block = ContentBlock::new(kind, "item").with_depth(depth);
        let key = block.key();
        let state = caret_below(above, block);

        let next = on_tab(&state, shift, 4);

        assert_eq!(next.map(|next| next.content().block(key).depth()), expected);
    }

    #[rstest]
    #[case::first_item(BlockType::UnorderedListItem, 0, false, None)]
    #[case::first_item_outdent(BlockType::OrderedListItem, 1, true, Some(0))]
    #[case::checkable_first_item(BlockType::CheckableListItem, 0, false, Some(1))]
    #[case::not_a_list(BlockType::Unstyled, 0, false, None)]
    fn test_tab_after_paragraph(
        #[case] kind: BlockType,
        #[case] depth: u8,
        #[case] shift: bool,
        #[case] expected: Option<u8>,
    ) {
        let block = ContentBlock::new(kind, "item").with_depth(depth);
        let key = block.key();
        let state = caret_in(block, 2);

        let next = on_tab(&state, shift, 4);

        assert_eq!(next.map(|next| next.content().block(key).depth()), expected);
    }

    #[test]
    fn test_repeated_tab_stops_one_level_below_neighbour() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new(BlockType::UnorderedListItem, "a"),
            ContentBlock::new(BlockType::UnorderedListItem, "b"),
        ]);
        let key = content.last_block().key();
        let mut state = EditorState::create_with_content(content)
            .force_selection(SelectionState::collapsed(key, 0));

        // Given one tab has nested "b" under "a"
        state = on_tab(&state, false, 4).unwrap();

        // Then further tabs are declined
        assert!(on_tab(&state, false, 4).is_none());
        assert_eq!(state.content().block(key).depth(), 1);
    }

    #[test]
    fn test_tab_declines_multi_block_selection() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new(BlockType::UnorderedListItem, "a"),
            ContentBlock::new(BlockType::UnorderedListItem, "b"),
        ]);
        let first = content.first_block().key();
        let last = content.last_block().key();
        let state = EditorState::create_with_content(content.clone())
            .force_selection(content.select((first, 0), (last, 1)));

        assert!(on_tab(&state, false, 4).is_none());
    }

    #[test]
    fn test_toggle_checked_flips() {
        let block = ContentBlock::new(BlockType::CheckableListItem, "task");
        let key = block.key();
        let state = caret_in(block, 0);

        let checked = toggle_checked(&state, key);
        assert!(checked.content().block(key).data().is_checked());
        assert_eq!(checked.last_edit_kind(), Some(EditKind::ChangeBlockData));

        let unchecked = toggle_checked(&checked, key);
        assert!(!unchecked.content().block(key).data().is_checked());
    }

    #[test]
    fn test_toggle_checked_ignores_other_blocks() {
        let block = ContentBlock::new(BlockType::UnorderedListItem, "task");
        let key = block.key();
        let state = caret_in(block, 0);

        let next = toggle_checked(&state, key);

        assert!(next.content().is_same_revision(state.content()));
    }
}
