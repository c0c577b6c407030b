use crate::model::BlockKey;

/// A caret or range inside the document.
///
/// Anchor is where the selection started, focus is where it ends. Offsets
/// are char offsets into the block text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
    /// Focus comes before anchor in document order
    pub is_backward: bool,
    pub has_focus: bool,
}

impl SelectionState {
    /// A focused caret.
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        Self {
            anchor_key: key,
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
            is_backward: false,
            has_focus: true,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn start_key(&self) -> BlockKey {
        if self.is_backward {
            self.focus_key
        } else {
            self.anchor_key
        }
    }

    pub fn start_offset(&self) -> usize {
        if self.is_backward {
            self.focus_offset
        } else {
            self.anchor_offset
        }
    }

    pub fn end_key(&self) -> BlockKey {
        if self.is_backward {
            self.anchor_key
        } else {
            self.focus_key
        }
    }

    pub fn end_offset(&self) -> usize {
        if self.is_backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }

    /// Start and end in the same block.
    pub fn is_single_block(&self) -> bool {
        self.anchor_key == self.focus_key
    }

    /// Collapse onto the start edge.
    pub fn collapse_to_start(&self) -> Self {
        Self {
            has_focus: self.has_focus,
            ..Self::collapsed(self.start_key(), self.start_offset())
        }
    }

    pub fn with_focus(self, has_focus: bool) -> Self {
        Self { has_focus, ..self }
    }
}
