use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{BlockKey, BlockType, ContentBlock, Entity, EntityKey, SelectionState};

/// One immutable revision of the document: ordered blocks plus the entity
/// map their characters point into.
///
/// Revisions share unchanged blocks through `Arc`, so cloning is cheap and
/// an edit only allocates the blocks it touches. Comparing two revisions
/// with [`ContentState::is_same_revision`] is O(1).
#[derive(Debug, Clone)]
pub struct ContentState {
    pub(crate) blocks: Arc<Vec<Arc<ContentBlock>>>,
    pub(crate) entities: Arc<BTreeMap<EntityKey, Entity>>,
    pub(crate) next_entity_key: u32,
}

impl ContentState {
    /// A document holding a single empty paragraph.
    pub fn empty() -> Self {
        Self::from_blocks(Vec::new())
    }

    /// Build from blocks. An empty list yields a single empty paragraph.
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self::from_parts(blocks, BTreeMap::new())
    }

    /// Build from blocks and the entities their characters reference.
    pub fn from_parts(blocks: Vec<ContentBlock>, entities: BTreeMap<EntityKey, Entity>) -> Self {
        let mut blocks: Vec<Arc<ContentBlock>> = blocks.into_iter().map(Arc::new).collect();
        if blocks.is_empty() {
            blocks.push(Arc::new(ContentBlock::empty(BlockType::Unstyled)));
        }
        let next_entity_key = entities.keys().last().map_or(1, |key| key.0 + 1);
        Self {
            blocks: Arc::new(blocks),
            entities: Arc::new(entities),
            next_entity_key,
        }
    }

    /// One unstyled block per line of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(
            text.split('\n')
                .map(|line| ContentBlock::new(BlockType::Unstyled, line))
                .collect(),
        )
    }

    pub fn blocks(&self) -> impl DoubleEndedIterator<Item = &ContentBlock> + ExactSizeIterator + '_ {
        self.blocks.iter().map(|block| block.as_ref())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_for_key(&self, key: BlockKey) -> Option<&ContentBlock> {
        self.blocks
            .iter()
            .find(|block| block.key == key)
            .map(|block| block.as_ref())
    }

    /// # Panics
    /// If no block has `key`.
    pub fn block(&self, key: BlockKey) -> &ContentBlock {
        match self.block_for_key(key) {
            Some(block) => block,
            None => panic!("unknown block key {key}"),
        }
    }

    pub fn index_of(&self, key: BlockKey) -> Option<usize> {
        self.blocks.iter().position(|block| block.key == key)
    }

    /// # Panics
    /// If no block has `key`.
    pub(crate) fn expect_index(&self, key: BlockKey) -> usize {
        match self.index_of(key) {
            Some(index) => index,
            None => panic!("unknown block key {key}"),
        }
    }

    pub fn block_before(&self, key: BlockKey) -> Option<&ContentBlock> {
        let index = self.index_of(key)?;
        index
            .checked_sub(1)
            .map(|before| self.blocks[before].as_ref())
    }

    pub fn block_after(&self, key: BlockKey) -> Option<&ContentBlock> {
        let index = self.index_of(key)?;
        self.blocks.get(index + 1).map(|block| block.as_ref())
    }

    pub fn first_block(&self) -> &ContentBlock {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &ContentBlock {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> + '_ {
        self.entities.iter().map(|(key, entity)| (*key, entity))
    }

    /// Block texts joined by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks()
            .map(ContentBlock::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_text(&self) -> bool {
        self.blocks.len() > 1 || !self.blocks[0].is_empty()
    }

    /// Whether both values are the very same revision, not merely equal ones.
    pub fn is_same_revision(&self, other: &ContentState) -> bool {
        Arc::ptr_eq(&self.blocks, &other.blocks) && Arc::ptr_eq(&self.entities, &other.entities)
    }

    /// Caret at the start of the document.
    pub fn selection_at_start(&self) -> SelectionState {
        SelectionState::collapsed(self.first_block().key, 0)
    }

    /// Caret at the end of the document.
    pub fn selection_at_end(&self) -> SelectionState {
        let last = self.last_block();
        SelectionState::collapsed(last.key, last.len())
    }

    /// A selection from `anchor` to `focus`, with direction worked out from
    /// document order.
    ///
    /// # Panics
    /// If either key is unknown or an offset is past the end of its block.
    pub fn select(&self, anchor: (BlockKey, usize), focus: (BlockKey, usize)) -> SelectionState {
        for (key, offset) in [anchor, focus] {
            let block = self.block(key);
            assert!(
                offset <= block.len(),
                "offset {offset} out of range for block {key} of length {}",
                block.len()
            );
        }
        let anchor_index = self.expect_index(anchor.0);
        let focus_index = self.expect_index(focus.0);
        SelectionState {
            anchor_key: anchor.0,
            anchor_offset: anchor.1,
            focus_key: focus.0,
            focus_offset: focus.1,
            is_backward: (focus_index, focus.1) < (anchor_index, anchor.1),
            has_focus: true,
        }
    }

    /// Blocks from the selection start to the selection end, inclusive.
    pub fn selected_blocks(&self, selection: &SelectionState) -> &[Arc<ContentBlock>] {
        let start = self.expect_index(selection.start_key());
        let end = self.expect_index(selection.end_key());
        &self.blocks[start..=end]
    }

    pub(crate) fn with_blocks(&self, blocks: Vec<Arc<ContentBlock>>) -> Self {
        debug_assert!(!blocks.is_empty());
        Self {
            blocks: Arc::new(blocks),
            entities: Arc::clone(&self.entities),
            next_entity_key: self.next_entity_key,
        }
    }

    /// Swap in a new version of the block with the same key.
    pub(crate) fn with_block(&self, block: ContentBlock) -> Self {
        let index = self.expect_index(block.key);
        let mut blocks = self.blocks.as_ref().clone();
        blocks[index] = Arc::new(block);
        self.with_blocks(blocks)
    }

    pub(crate) fn with_entity(&self, entity: Entity) -> (Self, EntityKey) {
        let key = EntityKey(self.next_entity_key);
        let mut entities = self.entities.as_ref().clone();
        entities.insert(key, entity);
        (
            Self {
                blocks: Arc::clone(&self.blocks),
                entities: Arc::new(entities),
                next_entity_key: self.next_entity_key + 1,
            },
            key,
        )
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Structural equality: same blocks (keys included) and same entities.
impl PartialEq for ContentState {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_revision(other)
            || (self.blocks.len() == other.blocks.len()
                && self
                    .blocks
                    .iter()
                    .zip(other.blocks.iter())
                    .all(|(left, right)| Arc::ptr_eq(left, right) || left == right)
                && self.entities == other.entities)
    }
}
