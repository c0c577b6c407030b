use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::model::{
    ContentBlock, ContentState, Decoration, Decorator, EntityKey, Mutability, SelectionState,
    StyleSet, modifier,
};

/// Undo entries kept before the oldest is dropped.
pub const MAX_UNDO_DEPTH: usize = 100;

/// What kind of change produced a revision. Drives undo grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    InsertCharacters,
    BackspaceCharacter,
    DeleteCharacter,
    RemoveRange,
    SplitBlock,
    InsertFragment,
    ChangeInlineStyle,
    ChangeBlockType,
    ChangeBlockData,
    AdjustDepth,
    ApplyEntity,
    Undo,
    Redo,
}

impl EditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EditKind::InsertCharacters => "insert-characters",
            EditKind::BackspaceCharacter => "backspace-character",
            EditKind::DeleteCharacter => "delete-character",
            EditKind::RemoveRange => "remove-range",
            EditKind::SplitBlock => "split-block",
            EditKind::InsertFragment => "insert-fragment",
            EditKind::ChangeInlineStyle => "change-inline-style",
            EditKind::ChangeBlockType => "change-block-type",
            EditKind::ChangeBlockData => "change-block-data",
            EditKind::AdjustDepth => "adjust-depth",
            EditKind::ApplyEntity => "apply-entity",
            EditKind::Undo => "undo",
            EditKind::Redo => "redo",
        }
    }

    /// Consecutive edits of these kinds share one undo step.
    fn is_typing(self) -> bool {
        matches!(
            self,
            EditKind::InsertCharacters | EditKind::BackspaceCharacter | EditKind::DeleteCharacter
        )
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    content: ContentState,
    selection: SelectionState,
}

/// Everything the editor needs to render and edit: the current revision,
/// the selection and the undo history.
///
/// Editor states are values. Every edit returns a new state and leaves the
/// old one intact.
#[derive(Clone)]
pub struct EditorState {
    content: ContentState,
    selection: SelectionState,
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    last_edit_kind: Option<EditKind>,
    /// Selection right after the last edit, to spot caret moves between edits
    selection_after_edit: Option<SelectionState>,
    inline_style_override: Option<StyleSet>,
    decorator: Option<Arc<dyn Decorator>>,
}

impl fmt::Debug for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorState")
            .field("content", &self.content)
            .field("selection", &self.selection)
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("last_edit_kind", &self.last_edit_kind)
            .field("inline_style_override", &self.inline_style_override)
            .field("decorator", &self.decorator)
            .finish()
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::create_empty()
    }
}

impl EditorState {
    pub fn create_empty() -> Self {
        Self::create_with_content(ContentState::empty())
    }

    /// Unfocused, caret at the start of the document, no history.
    pub fn create_with_content(content: ContentState) -> Self {
        let selection = content.selection_at_start().with_focus(false);
        Self {
            content,
            selection,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            last_edit_kind: None,
            selection_after_edit: None,
            inline_style_override: None,
            decorator: None,
        }
    }

    pub fn with_decorator(mut self, decorator: Arc<dyn Decorator>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn last_edit_kind(&self) -> Option<EditKind> {
        self.last_edit_kind
    }

    pub fn inline_style_override(&self) -> Option<StyleSet> {
        self.inline_style_override
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Block holding the selection start.
    pub fn start_block(&self) -> &ContentBlock {
        self.content.block(self.selection.start_key())
    }

    /// Decorations for one block, empty without a decorator.
    pub fn decorations(&self, block: &ContentBlock) -> Vec<Decoration> {
        self.decorator
            .as_ref()
            .map(|decorator| decorator.decorate(&self.content, block))
            .unwrap_or_default()
    }

    /// Commit a new revision.
    ///
    /// Starts a new undo step unless this is another typing edit of the same
    /// kind with the caret where the previous edit left it. Clears the redo
    /// stack and the inline style override.
    pub fn push(
        &self,
        content: ContentState,
        selection_after: SelectionState,
        kind: EditKind,
    ) -> Self {
        if content.is_same_revision(&self.content) {
            return self.force_selection(selection_after);
        }

        let continues_typing = kind.is_typing()
            && self.last_edit_kind == Some(kind)
            && self.selection_after_edit == Some(self.selection);

        let mut undo_stack = self.undo_stack.clone();
        if !continues_typing {
            undo_stack.push_back(HistoryEntry {
                content: self.content.clone(),
                selection: self.selection,
            });
            if undo_stack.len() > MAX_UNDO_DEPTH {
                undo_stack.pop_front();
            }
        }

        Self {
            content,
            selection: selection_after,
            undo_stack,
            redo_stack: Vec::new(),
            last_edit_kind: Some(kind),
            selection_after_edit: Some(selection_after),
            inline_style_override: None,
            decorator: self.decorator.clone(),
        }
    }

    /// Move the selection without touching content. A real move clears the
    /// inline style override.
    pub fn force_selection(&self, selection: SelectionState) -> Self {
        let mut next = self.clone();
        if selection != self.selection {
            next.inline_style_override = None;
        }
        next.selection = selection;
        next
    }

    /// Set the styles the next inserted characters get.
    pub fn set_inline_style_override(&self, style: StyleSet) -> Self {
        Self {
            inline_style_override: Some(style),
            ..self.clone()
        }
    }

    /// Step back one undo entry, or `None` with nothing to undo.
    pub fn undo(&self) -> Option<Self> {
        let mut undo_stack = self.undo_stack.clone();
        let entry = undo_stack.pop_back()?;
        let mut redo_stack = self.redo_stack.clone();
        redo_stack.push(HistoryEntry {
            content: self.content.clone(),
            selection: self.selection,
        });
        Some(Self {
            content: entry.content,
            selection: entry.selection,
            undo_stack,
            redo_stack,
            last_edit_kind: Some(EditKind::Undo),
            selection_after_edit: Some(entry.selection),
            inline_style_override: None,
            decorator: self.decorator.clone(),
        })
    }

    /// Re-apply the last undone entry, or `None` with nothing to redo.
    pub fn redo(&self) -> Option<Self> {
        let mut redo_stack = self.redo_stack.clone();
        let entry = redo_stack.pop()?;
        let mut undo_stack = self.undo_stack.clone();
        undo_stack.push_back(HistoryEntry {
            content: self.content.clone(),
            selection: self.selection,
        });
        Some(Self {
            content: entry.content,
            selection: entry.selection,
            undo_stack,
            redo_stack,
            last_edit_kind: Some(EditKind::Redo),
            selection_after_edit: Some(entry.selection),
            inline_style_override: None,
            decorator: self.decorator.clone(),
        })
    }

    /// Styles at the selection: the override if set, otherwise what the
    /// text at the selection start carries. An empty block inherits from
    /// the nearest non-empty block above it.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style) = self.inline_style_override {
            return style;
        }

        let block = self.start_block();
        let offset = self.selection.start_offset();
        if self.selection.is_collapsed() {
            if offset > 0 {
                return block.style_at(offset - 1);
            }
            if !block.is_empty() {
                return block.style_at(0);
            }
        } else {
            if offset < block.len() {
                return block.style_at(offset);
            }
            if offset > 0 {
                return block.style_at(offset - 1);
            }
        }
        self.look_upward_for_style(block)
    }

    fn look_upward_for_style(&self, block: &ContentBlock) -> StyleSet {
        let index = self.content.expect_index(block.key());
        self.content
            .blocks()
            .take(index)
            .rev()
            .find(|block| !block.is_empty())
            .map(|block| block.style_at(block.len() - 1))
            .unwrap_or_default()
    }

    /// Entity that typed text should continue: a mutable entity the caret
    /// sits inside of, or the one at the start of a replaced range.
    fn entity_for_insertion(&self) -> Option<EntityKey> {
        let block = self.start_block();
        let offset = self.selection.start_offset();
        let key = if self.selection.is_collapsed() {
            if offset == 0 {
                return None;
            }
            let before = block.entity_at(offset - 1);
            if before != block.entity_at(offset) {
                return None;
            }
            before?
        } else {
            block.entity_at(offset)?
        };
        let entity = self.content.entity(key)?;
        (entity.mutability() == Mutability::Mutable).then_some(key)
    }

    /// Type `text` at the selection with the current inline style.
    pub fn insert_characters(&self, text: &str) -> Self {
        let (content, selection) = modifier::insert_text(
            &self.content,
            &self.selection,
            text,
            self.current_inline_style(),
            self.entity_for_insertion(),
        );
        self.push(content, selection, EditKind::InsertCharacters)
    }

    pub fn split_block(&self) -> Self {
        let (content, selection) = modifier::split_block(&self.content, &self.selection);
        self.push(content, selection, EditKind::SplitBlock)
    }

    /// Insert a pasted fragment at the selection.
    pub fn insert_fragment(&self, fragment: &ContentState) -> Self {
        let (content, selection) =
            modifier::replace_with_fragment(&self.content, &self.selection, fragment);
        self.push(content, selection, EditKind::InsertFragment)
    }

    fn remove(&self, selection: SelectionState, kind: EditKind) -> Self {
        if selection.is_collapsed() {
            return self.clone();
        }
        let (content, caret) = modifier::remove_range(&self.content, &selection);
        self.push(content, caret, kind)
    }

    /// Range selected: delete it. Otherwise delete the char before the caret,
    /// or join with the block above at a block start.
    pub fn backspace(&self) -> Self {
        if !self.selection.is_collapsed() {
            return self.remove(self.selection, EditKind::RemoveRange);
        }
        let key = self.selection.start_key();
        let offset = self.selection.start_offset();
        if offset > 0 {
            let range = self.content.select((key, offset - 1), (key, offset));
            return self.remove(range, EditKind::BackspaceCharacter);
        }
        match self.content.block_before(key) {
            Some(before) => {
                let range = self.content.select((before.key(), before.len()), (key, 0));
                self.remove(range, EditKind::BackspaceCharacter)
            }
            None => self.clone(),
        }
    }

    /// Delete back to the start of the previous word.
    pub fn backspace_word(&self) -> Self {
        if !self.selection.is_collapsed() || self.selection.start_offset() == 0 {
            return self.backspace();
        }
        let block = self.start_block();
        let offset = self.selection.start_offset();
        let chars: Vec<char> = block.text().chars().take(offset).collect();
        let mut start = offset;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let range = self.content.select((block.key(), start), (block.key(), offset));
        self.remove(range, EditKind::RemoveRange)
    }

    pub fn backspace_to_start_of_line(&self) -> Self {
        if !self.selection.is_collapsed() || self.selection.start_offset() == 0 {
            return self.backspace();
        }
        let key = self.selection.start_key();
        let range = self
            .content
            .select((key, 0), (key, self.selection.start_offset()));
        self.remove(range, EditKind::RemoveRange)
    }

    /// Range selected: delete it. Otherwise delete the char after the caret,
    /// or pull the block below up at a block end.
    pub fn delete_forward(&self) -> Self {
        if !self.selection.is_collapsed() {
            return self.remove(self.selection, EditKind::RemoveRange);
        }
        let block = self.start_block();
        let key = block.key();
        let offset = self.selection.start_offset();
        if offset < block.len() {
            let range = self.content.select((key, offset), (key, offset + 1));
            return self.remove(range, EditKind::DeleteCharacter);
        }
        match self.content.block_after(key) {
            Some(after) => {
                let range = self.content.select((key, offset), (after.key(), 0));
                self.remove(range, EditKind::DeleteCharacter)
            }
            None => self.clone(),
        }
    }

    /// Delete forward to the end of the next word.
    pub fn delete_word(&self) -> Self {
        let block = self.start_block();
        let offset = self.selection.start_offset();
        if !self.selection.is_collapsed() || offset == block.len() {
            return self.delete_forward();
        }
        let chars: Vec<char> = block.text().chars().collect();
        let mut end = offset;
        while end < chars.len() && chars[end].is_whitespace() {
            end += 1;
        }
        while end < chars.len() && !chars[end].is_whitespace() {
            end += 1;
        }
        let range = self.content.select((block.key(), offset), (block.key(), end));
        self.remove(range, EditKind::RemoveRange)
    }

    pub fn delete_to_end_of_block(&self) -> Self {
        let block = self.start_block();
        let offset = self.selection.start_offset();
        if !self.selection.is_collapsed() || offset == block.len() {
            return self.delete_forward();
        }
        let range = self
            .content
            .select((block.key(), offset), (block.key(), block.len()));
        self.remove(range, EditKind::RemoveRange)
    }

    pub fn select_all(&self) -> Self {
        let first = self.content.first_block();
        let last = self.content.last_block();
        let selection = self
            .content
            .select((first.key(), 0), (last.key(), last.len()));
        self.force_selection(selection)
    }

    /// Drop focus, keeping the selection where it is.
    pub fn blur(&self) -> Self {
        self.force_selection(self.selection.with_focus(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockType, Entity, InlineStyle, LinkDecorator};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn focused(text: &str) -> EditorState {
        let state = EditorState::create_with_content(ContentState::from_text(text));
        let caret = state.content().selection_at_end();
        state.force_selection(caret)
    }

    fn type_text(state: &EditorState, text: &str) -> EditorState {
        text.chars()
            .fold(state.clone(), |state, ch| state.insert_characters(&ch.to_string()))
    }

    #[test]
    fn test_new_state_is_unfocused_at_start() {
        let state = EditorState::create_with_content(ContentState::from_text("abc"));

        assert!(!state.selection().has_focus);
        assert_eq!(state.selection().start_offset(), 0);
        assert!(!state.can_undo());
    }

    #[test]
    fn test_typing_coalesces_into_one_undo_step() {
        let state = focused("");

        let typed = type_text(&state, "hello");

        assert_eq!(typed.content().plain_text(), "hello");
        let undone = typed.undo().unwrap();
        assert_eq!(undone.content().plain_text(), "");
        assert!(!undone.can_undo());
    }

    #[test]
    fn test_moving_caret_starts_new_undo_step() {
        // Given some typed text
        let typed = type_text(&focused(""), "ab");

        // When the caret moves and more is typed
        let key = typed.content().first_block().key();
        let moved = typed.force_selection(SelectionState::collapsed(key, 0));
        let typed = type_text(&moved, "x");

        // Then undo only removes the second burst
        assert_eq!(typed.content().plain_text(), "xab");
        assert_eq!(typed.undo().unwrap().content().plain_text(), "ab");
    }

    #[test]
    fn test_switching_edit_kind_starts_new_undo_step() {
        let typed = type_text(&focused(""), "abc");
        let erased = typed.backspace();

        assert_eq!(erased.content().plain_text(), "ab");
        assert_eq!(erased.last_edit_kind(), Some(EditKind::BackspaceCharacter));
        assert_eq!(erased.undo().unwrap().content().plain_text(), "abc");
    }

    #[test]
    fn test_redo_restores_and_new_edit_clears_redo() {
        let typed = type_text(&focused(""), "abc");
        let undone = typed.undo().unwrap();

        let redone = undone.redo().unwrap();
        assert_eq!(redone.content().plain_text(), "abc");
        assert_eq!(redone.selection(), typed.selection());
        assert_eq!(redone.last_edit_kind(), Some(EditKind::Redo));

        let diverged = undone.insert_characters("z");
        assert!(!diverged.can_redo());
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut state = focused("");
        for _ in 0..(MAX_UNDO_DEPTH + 20) {
            state = state.insert_characters("a").split_block();
        }

        let mut steps = 0;
        while let Some(previous) = state.undo() {
            state = previous;
            steps += 1;
        }
        assert_eq!(steps, MAX_UNDO_DEPTH);
    }

    #[test]
    fn test_override_wins_and_is_cleared_by_typing() {
        let state = focused("plain");
        let bold = StyleSet::EMPTY.with(InlineStyle::Bold);

        let overridden = state.set_inline_style_override(bold);
        assert_eq!(overridden.current_inline_style(), bold);

        let typed = overridden.insert_characters("!");
        assert_eq!(typed.content().first_block().style_at(5), bold);
        assert_eq!(typed.inline_style_override(), None);
        assert_eq!(typed.current_inline_style(), bold);
    }

    #[test]
    fn test_override_cleared_by_caret_move() {
        let state = focused("plain");
        let overridden = state.set_inline_style_override(StyleSet::EMPTY.with(InlineStyle::Code));

        let same = overridden.force_selection(*overridden.selection());
        assert!(same.inline_style_override().is_some());

        let key = state.content().first_block().key();
        let moved = overridden.force_selection(SelectionState::collapsed(key, 1));
        assert_eq!(moved.inline_style_override(), None);
    }

    #[rstest]
    #[case::collapsed_mid_text(1, 1, true)]
    #[case::collapsed_at_block_start_reads_first_char(0, 0, true)]
    #[case::collapsed_after_plain_char(2, 2, false)]
    #[case::range_reads_first_selected_char(1, 2, false)]
    fn test_current_style_reads_text(
        #[case] anchor: usize,
        #[case] focus: usize,
        #[case] expect_bold: bool,
    ) {
        // "ab" with only "a" bold
        let state = focused("ab");
        let key = state.content().first_block().key();
        let content = modifier::apply_inline_style(
            state.content(),
            &state.content().select((key, 0), (key, 1)),
            InlineStyle::Bold,
        );
        let state = EditorState::create_with_content(content.clone())
            .force_selection(content.select((key, anchor), (key, focus)));

        assert_eq!(state.current_inline_style().contains(InlineStyle::Bold), expect_bold);
    }

    #[test]
    fn test_empty_block_looks_upward_for_style() {
        let content = ContentState::from_text("styled\n\n");
        let first = content.first_block().key();
        let content = modifier::apply_inline_style(
            &content,
            &content.select((first, 0), (first, 6)),
            InlineStyle::Italic,
        );
        let state = EditorState::create_with_content(content.clone())
            .force_selection(content.selection_at_end());

        assert_eq!(
            state.current_inline_style(),
            StyleSet::EMPTY.with(InlineStyle::Italic)
        );
    }

    #[test]
    fn test_backspace_at_block_start_joins_blocks() {
        let state = focused("ab\ncd");
        let second = state.content().last_block().key();
        let state = state.force_selection(SelectionState::collapsed(second, 0));

        let joined = state.backspace();

        assert_eq!(joined.content().plain_text(), "abcd");
        assert_eq!(joined.selection().start_offset(), 2);
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let state = focused("ab");
        let key = state.content().first_block().key();
        let state = state.force_selection(SelectionState::collapsed(key, 0));

        assert!(state.backspace().content().is_same_revision(state.content()));
    }

    #[test]
    fn test_word_deletion() {
        let state = focused("one two  ");

        assert_eq!(state.backspace_word().content().plain_text(), "one ");
        assert_eq!(
            state.backspace_to_start_of_line().content().plain_text(),
            ""
        );

        let key = state.content().first_block().key();
        let at_start = state.force_selection(SelectionState::collapsed(key, 0));
        assert_eq!(at_start.delete_word().content().plain_text(), " two  ");
        assert_eq!(at_start.delete_to_end_of_block().content().plain_text(), "");
    }

    #[test]
    fn test_delete_forward_at_block_end_joins_next() {
        let state = focused("ab\ncd");
        let first = state.content().first_block().key();
        let state = state.force_selection(SelectionState::collapsed(first, 2));

        let joined = state.delete_forward();

        assert_eq!(joined.content().plain_text(), "abcd");
        assert_eq!(joined.content().first_block().key(), first);
    }

    #[test]
    fn test_typing_inside_link_extends_it() {
        let state = focused("ab");
        let key = state.content().first_block().key();
        let (content, link) =
            modifier::create_entity(state.content(), Entity::link("https://a.example"));
        let content = modifier::apply_entity(&content, &content.select((key, 0), (key, 2)), Some(link));
        let state = EditorState::create_with_content(content)
            .force_selection(SelectionState::collapsed(key, 1));

        let typed = state.insert_characters("x");
        assert_eq!(typed.content().first_block().entity_at(1), Some(link));

        // At the end of the link the caret is outside it
        let at_end = typed.force_selection(SelectionState::collapsed(key, 3));
        let typed = at_end.insert_characters("y");
        assert_eq!(typed.content().first_block().entity_at(3), None);
    }

    #[test]
    fn test_select_all_and_blur() {
        let state = focused("ab\ncd");

        let all = state.select_all();
        assert_eq!(all.selection().start_offset(), 0);
        assert_eq!(all.selection().end_key(), state.content().last_block().key());
        assert_eq!(all.selection().end_offset(), 2);

        let blurred = all.blur();
        assert!(!blurred.selection().has_focus);
        assert!(blurred.content().is_same_revision(state.content()));
    }

    #[test]
    fn test_split_keeps_type() {
        let content = ContentState::from_blocks(vec![ContentBlock::new(BlockType::OrderedListItem, "ab")]);
        let state = EditorState::create_with_content(content.clone())
            .force_selection(content.selection_at_end());

        let split = state.split_block();

        assert_eq!(split.content().block_count(), 2);
        assert_eq!(split.start_block().kind(), BlockType::OrderedListItem);
    }

    #[test]
    fn test_decorations_come_from_decorator() {
        let state = focused("x");
        assert!(state.decorations(state.start_block()).is_empty());

        let key = state.content().first_block().key();
        let (content, link) = modifier::create_entity(state.content(), Entity::link("https://x.example"));
        let content = modifier::apply_entity(&content, &content.select((key, 0), (key, 1)), Some(link));
        let decorated = EditorState::create_with_content(content).with_decorator(Arc::new(LinkDecorator));

        assert_eq!(decorated.decorations(decorated.start_block()).len(), 1);
    }
}
