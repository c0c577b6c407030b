//! Generic style and block commands, independent of list rules.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::model::{BlockType, EditKind, EditorState, InlineStyle, SelectionState, modifier};

/// A named editing command, as produced by the host's key bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
    Mark,
    Backspace,
    BackspaceWord,
    BackspaceToStartOfLine,
    Delete,
    DeleteWord,
    DeleteToEndOfBlock,
    SplitBlock,
    Undo,
    Redo,
    /// A binding this editor has no handler for
    Other(String),
}

impl KeyCommand {
    pub fn as_str(&self) -> &str {
        match self {
            KeyCommand::Bold => "bold",
            KeyCommand::Italic => "italic",
            KeyCommand::Underline => "underline",
            KeyCommand::Code => "code",
            KeyCommand::Strikethrough => "strikethrough",
            KeyCommand::Mark => "mark",
            KeyCommand::Backspace => "backspace",
            KeyCommand::BackspaceWord => "backspace-word",
            KeyCommand::BackspaceToStartOfLine => "backspace-to-start-of-line",
            KeyCommand::Delete => "delete",
            KeyCommand::DeleteWord => "delete-word",
            KeyCommand::DeleteToEndOfBlock => "delete-to-end-of-block",
            KeyCommand::SplitBlock => "split-block",
            KeyCommand::Undo => "undo",
            KeyCommand::Redo => "redo",
            KeyCommand::Other(name) => name,
        }
    }

    fn is_backspace(&self) -> bool {
        matches!(
            self,
            KeyCommand::Backspace | KeyCommand::BackspaceWord | KeyCommand::BackspaceToStartOfLine
        )
    }
}

impl FromStr for KeyCommand {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bold" => KeyCommand::Bold,
            "italic" => KeyCommand::Italic,
            "underline" => KeyCommand::Underline,
            "code" => KeyCommand::Code,
            "strikethrough" => KeyCommand::Strikethrough,
            "mark" => KeyCommand::Mark,
            "backspace" => KeyCommand::Backspace,
            "backspace-word" => KeyCommand::BackspaceWord,
            "backspace-to-start-of-line" => KeyCommand::BackspaceToStartOfLine,
            "delete" => KeyCommand::Delete,
            "delete-word" => KeyCommand::DeleteWord,
            "delete-to-end-of-block" => KeyCommand::DeleteToEndOfBlock,
            "split-block" => KeyCommand::SplitBlock,
            "undo" => KeyCommand::Undo,
            "redo" => KeyCommand::Redo,
            other => KeyCommand::Other(other.to_string()),
        })
    }
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toggle an inline style.
///
/// On a caret this only changes the style the next typed characters get. On
/// a range the style is removed if the range start already has it and
/// applied otherwise.
pub fn toggle_inline_style(state: &EditorState, style: InlineStyle) -> EditorState {
    let current = state.current_inline_style();
    let selection = state.selection();
    if selection.is_collapsed() {
        return state.set_inline_style_override(current.toggled(style));
    }

    let content = if current.contains(style) {
        modifier::remove_inline_style(state.content(), selection, style)
    } else {
        modifier::apply_inline_style(state.content(), selection, style)
    };
    state.push(content, *selection, EditKind::ChangeInlineStyle)
}

/// `code` toggles a code block for a caret or a multi-block selection, and
/// the `CODE` style for a range within one block.
pub fn toggle_code(state: &EditorState) -> EditorState {
    let selection = state.selection();
    if selection.is_collapsed() || !selection.is_single_block() {
        toggle_block_type(state, BlockType::CodeBlock)
    } else {
        toggle_inline_style(state, InlineStyle::Code)
    }
}

/// Set every selected block to `kind`, or back to `unstyled` when the first
/// selected block already is `kind`.
pub fn toggle_block_type(state: &EditorState, kind: BlockType) -> EditorState {
    let content = state.content();
    let selection = *state.selection();

    // A selection ending at offset 0 of a block (as after a triple click)
    // does not include that block
    let mut target = selection;
    if !selection.is_single_block() && selection.end_offset() == 0 {
        if let Some(before) = content.block_before(selection.end_key()) {
            target = content.select(
                (selection.start_key(), selection.start_offset()),
                (before.key(), before.len()),
            );
        }
    }

    let kind = if content.block(selection.start_key()).kind() == kind {
        BlockType::Unstyled
    } else {
        kind
    };
    let updated = modifier::set_block_type(content, &target, kind);
    state.push(updated, selection, EditKind::ChangeBlockType)
}

/// Type of the block holding the selection start.
pub fn current_block_type(state: &EditorState) -> BlockType {
    state.start_block().kind()
}

/// With a caret at the start of a styled block, turn it back into a
/// paragraph. A code block directly below non-empty code is left alone so
/// backspace can join them.
pub fn try_to_remove_block_style(state: &EditorState) -> Option<EditorState> {
    let selection = state.selection();
    if !selection.is_collapsed() || selection.anchor_offset != 0 {
        return None;
    }
    let content = state.content();
    let block = content.block(selection.anchor_key);
    if block.kind() == BlockType::CodeBlock {
        let joins_code = content
            .block_before(block.key())
            .is_some_and(|before| before.kind() == BlockType::CodeBlock && !before.is_empty());
        if joins_code {
            return None;
        }
    }
    if block.kind() == BlockType::Unstyled {
        return None;
    }
    let updated = modifier::set_block_type(content, selection, BlockType::Unstyled);
    Some(state.push(updated, *selection, EditKind::ChangeBlockType))
}

/// Run a command, or `None` if this handler does not apply to it. Deletion
/// commands are only handled at a block start, where they strip the block
/// style; everything else about deleting text is left to the default
/// editing behaviour.
pub fn handle_key_command(state: &EditorState, command: &KeyCommand) -> Option<EditorState> {
    match command {
        KeyCommand::Bold => Some(toggle_inline_style(state, InlineStyle::Bold)),
        KeyCommand::Italic => Some(toggle_inline_style(state, InlineStyle::Italic)),
        KeyCommand::Underline => Some(toggle_inline_style(state, InlineStyle::Underline)),
        KeyCommand::Strikethrough => Some(toggle_inline_style(state, InlineStyle::Strikethrough)),
        KeyCommand::Mark => Some(toggle_inline_style(state, InlineStyle::Mark)),
        KeyCommand::Code => Some(toggle_code(state)),
        command if command.is_backspace() => try_to_remove_block_style(state),
        KeyCommand::Undo => state.undo(),
        KeyCommand::Redo => state.redo(),
        KeyCommand::SplitBlock => Some(state.split_block()),
        _ => None,
    }
}

/// What the host's input layer does with a command nobody handled.
pub fn apply_default_key_command(state: &EditorState, command: &KeyCommand) -> Option<EditorState> {
    match command {
        KeyCommand::Backspace => Some(state.backspace()),
        KeyCommand::BackspaceWord => Some(state.backspace_word()),
        KeyCommand::BackspaceToStartOfLine => Some(state.backspace_to_start_of_line()),
        KeyCommand::Delete => Some(state.delete_forward()),
        KeyCommand::DeleteWord => Some(state.delete_word()),
        KeyCommand::DeleteToEndOfBlock => Some(state.delete_to_end_of_block()),
        KeyCommand::SplitBlock => Some(state.split_block()),
        _ => None,
    }
}

/// Whether the selection starts at the very beginning of the document.
pub fn is_selection_at_start(state: &EditorState) -> bool {
    let selection: &SelectionState = state.selection();
    selection.focus_key == state.content().first_block().key() && selection.start_offset() == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, ContentState, StyleSet};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn state_with(blocks: Vec<ContentBlock>) -> EditorState {
        let content = ContentState::from_blocks(blocks);
        let caret = content.selection_at_start();
        EditorState::create_with_content(content).force_selection(caret)
    }

    fn select(state: &EditorState, anchor: (usize, usize), focus: (usize, usize)) -> EditorState {
        let keys: Vec<_> = state.content().blocks().map(ContentBlock::key).collect();
        let selection = state
            .content()
            .select((keys[anchor.0], anchor.1), (keys[focus.0], focus.1));
        state.force_selection(selection)
    }

    #[rstest]
    #[case("bold", KeyCommand::Bold)]
    #[case("backspace-to-start-of-line", KeyCommand::BackspaceToStartOfLine)]
    #[case("split-block", KeyCommand::SplitBlock)]
    #[case("transpose-characters", KeyCommand::Other("transpose-characters".to_string()))]
    fn test_command_names(#[case] name: &str, #[case] expected: KeyCommand) {
        let parsed: KeyCommand = name.parse().unwrap();

        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), name);
    }

    #[test]
    fn test_toggle_style_on_caret_sets_override_only() {
        let state = state_with(vec![ContentBlock::new(BlockType::Unstyled, "abc")]);

        let toggled = toggle_inline_style(&state, InlineStyle::Strikethrough);

        assert!(toggled.content().is_same_revision(state.content()));
        assert_eq!(
            toggled.current_inline_style(),
            StyleSet::EMPTY.with(InlineStyle::Strikethrough)
        );

        let toggled_back = toggle_inline_style(&toggled, InlineStyle::Strikethrough);
        assert_eq!(toggled_back.current_inline_style(), StyleSet::EMPTY);
    }

    #[test]
    fn test_toggle_style_on_range_applies_then_removes() {
        let state = state_with(vec![ContentBlock::new(BlockType::Unstyled, "abc")]);
        let selected = select(&state, (0, 0), (0, 2));

        let marked = toggle_inline_style(&selected, InlineStyle::Mark);
        assert_eq!(marked.last_edit_kind(), Some(EditKind::ChangeInlineStyle));
        assert_eq!(marked.selection(), selected.selection());
        assert!(marked.content().first_block().style_at(1).contains(InlineStyle::Mark));
        assert!(!marked.content().first_block().style_at(2).contains(InlineStyle::Mark));

        let unmarked = toggle_inline_style(&marked, InlineStyle::Mark);
        assert!(unmarked.content().first_block().inline_style_ranges().is_empty());
    }

    #[test]
    fn test_toggle_block_type_and_back() {
        let state = state_with(vec![ContentBlock::new(BlockType::Unstyled, "abc")]);

        let quoted = toggle_block_type(&state, BlockType::Blockquote);
        assert_eq!(current_block_type(&quoted), BlockType::Blockquote);

        let plain = toggle_block_type(&quoted, BlockType::Blockquote);
        assert_eq!(current_block_type(&plain), BlockType::Unstyled);
    }

    #[test]
    fn test_toggle_block_type_skips_block_selected_at_offset_zero() {
        let state = state_with(vec![
            ContentBlock::new(BlockType::Unstyled, "one"),
            ContentBlock::new(BlockType::Unstyled, "two"),
        ]);
        let selected = select(&state, (0, 0), (1, 0));

        let headed = toggle_block_type(&selected, BlockType::HeaderOne);

        let kinds: Vec<_> = headed.content().blocks().map(ContentBlock::kind).collect();
        assert_eq!(kinds, vec![BlockType::HeaderOne, BlockType::Unstyled]);
    }

    #[test]
    fn test_code_command_picks_block_or_style() {
        let state = state_with(vec![ContentBlock::new(BlockType::Unstyled, "abc")]);

        let block = handle_key_command(&state, &KeyCommand::Code).unwrap();
        assert_eq!(current_block_type(&block), BlockType::CodeBlock);

        let ranged = select(&state, (0, 0), (0, 1));
        let styled = handle_key_command(&ranged, &KeyCommand::Code).unwrap();
        assert_eq!(current_block_type(&styled), BlockType::Unstyled);
        assert!(styled.content().first_block().style_at(0).contains(InlineStyle::Code));
    }

    #[test]
    fn test_backspace_at_block_start_removes_style() {
        let state = state_with(vec![ContentBlock::new(BlockType::HeaderTwo, "Title")]);

        let stripped = handle_key_command(&state, &KeyCommand::Backspace).unwrap();

        assert_eq!(current_block_type(&stripped), BlockType::Unstyled);
        assert_eq!(stripped.content().first_block().text(), "Title");
    }

    #[test]
    fn test_backspace_declines_mid_text_and_on_paragraphs() {
        let heading = state_with(vec![ContentBlock::new(BlockType::HeaderTwo, "Title")]);
        let mid_text = select(&heading, (0, 2), (0, 2));
        assert!(handle_key_command(&mid_text, &KeyCommand::Backspace).is_none());

        let paragraph = state_with(vec![ContentBlock::new(BlockType::Unstyled, "x")]);
        assert!(handle_key_command(&paragraph, &KeyCommand::BackspaceWord).is_none());
    }

    #[test]
    fn test_code_block_after_code_is_not_unstyled() {
        let state = state_with(vec![
            ContentBlock::new(BlockType::CodeBlock, "let a;"),
            ContentBlock::new(BlockType::CodeBlock, "let b;"),
        ]);
        let second = select(&state, (1, 0), (1, 0));

        assert!(try_to_remove_block_style(&second).is_none());
    }

    #[test]
    fn test_delete_is_left_to_default_behaviour() {
        let state = state_with(vec![ContentBlock::new(BlockType::HeaderOne, "ab")]);

        assert!(handle_key_command(&state, &KeyCommand::Delete).is_none());
        let deleted = apply_default_key_command(&state, &KeyCommand::Delete).unwrap();
        assert_eq!(deleted.content().first_block().text(), "b");
    }

    #[test]
    fn test_undo_redo_commands() {
        let state = state_with(vec![ContentBlock::new(BlockType::Unstyled, "")]);
        assert!(handle_key_command(&state, &KeyCommand::Undo).is_none());

        let typed = state.insert_characters("x");
        let undone = handle_key_command(&typed, &KeyCommand::Undo).unwrap();
        assert_eq!(undone.content().plain_text(), "");
        let redone = handle_key_command(&undone, &KeyCommand::Redo).unwrap();
        assert_eq!(redone.content().plain_text(), "x");
    }

    #[test]
    fn test_unknown_command_is_not_handled() {
        let state = state_with(vec![ContentBlock::new(BlockType::Unstyled, "x")]);
        let command = KeyCommand::Other("secret-handshake".to_string());

        assert!(handle_key_command(&state, &command).is_none());
        assert!(apply_default_key_command(&state, &command).is_none());
    }

    #[test]
    fn test_selection_at_start() {
        let state = state_with(vec![
            ContentBlock::new(BlockType::Unstyled, "a"),
            ContentBlock::new(BlockType::Unstyled, "b"),
        ]);

        assert!(is_selection_at_start(&state));
        assert!(!is_selection_at_start(&select(&state, (0, 1), (0, 1))));
        assert!(!is_selection_at_start(&select(&state, (1, 0), (1, 0))));
    }
}
