//! Primitive edits on a [`ContentState`].
//!
//! Every function takes a revision and returns a new one; the input is never
//! touched. Blocks outside the edited range are shared with the input by
//! pointer. Unknown block keys and offsets past the end of a block are
//! contract violations and panic.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use crate::model::{
    BlockData, BlockKey, BlockType, CharacterMetadata, ContentBlock, ContentState, Entity,
    EntityKey, InlineStyle, SelectionState, StyleSet,
};

/// Rebuild every selected block with `f`, which receives the block and the
/// char range of it the selection covers.
fn map_selected(
    content: &ContentState,
    selection: &SelectionState,
    f: impl Fn(&ContentBlock, Range<usize>) -> ContentBlock,
) -> ContentState {
    let start = content.expect_index(selection.start_key());
    let end = content.expect_index(selection.end_key());
    let mut blocks = content.blocks.as_ref().clone();
    for index in start..=end {
        let block: &ContentBlock = &blocks[index];
        let from = if index == start {
            selection.start_offset()
        } else {
            0
        };
        let to = if index == end {
            selection.end_offset()
        } else {
            block.len()
        };
        let updated = f(block, from..to);
        blocks[index] = Arc::new(updated);
    }
    content.with_blocks(blocks)
}

/// Insert `text` at the selection, replacing it if it is a range. Every
/// inserted char gets `style` and `entity`. Returns the caret after the
/// inserted text.
pub fn insert_text(
    content: &ContentState,
    selection: &SelectionState,
    text: &str,
    style: StyleSet,
    entity: Option<EntityKey>,
) -> (ContentState, SelectionState) {
    let (content, caret) = remove_range(content, selection);
    let block = content.block(caret.anchor_key);
    let offset = caret.anchor_offset;
    let ((mut new_text, mut characters), (tail, tail_characters)) = block.split_at(offset);

    let inserted = text.chars().count();
    new_text.push_str(text);
    new_text.push_str(&tail);
    characters.extend(std::iter::repeat_n(
        CharacterMetadata::new(style, entity),
        inserted,
    ));
    characters.extend(tail_characters);

    let updated = block.with_content(new_text, characters);
    let caret = SelectionState::collapsed(updated.key, offset + inserted).with_focus(caret.has_focus);
    (content.with_block(updated), caret)
}

/// Delete the selected text. A range spanning blocks merges the end block's
/// tail into the start block, which keeps its key, type and data.
pub fn remove_range(
    content: &ContentState,
    selection: &SelectionState,
) -> (ContentState, SelectionState) {
    let caret = selection.collapse_to_start();
    if selection.is_collapsed() {
        return (content.clone(), caret);
    }

    let start = content.expect_index(selection.start_key());
    let end = content.expect_index(selection.end_key());
    let start_block = &content.blocks[start];
    let ((mut text, mut characters), _) = start_block.split_at(selection.start_offset());
    let (_, (tail, tail_characters)) = content.blocks[end].split_at(selection.end_offset());
    text.push_str(&tail);
    characters.extend(tail_characters);

    let mut blocks = Vec::with_capacity(content.block_count() - (end - start));
    blocks.extend_from_slice(&content.blocks[..start]);
    blocks.push(Arc::new(start_block.with_content(text, characters)));
    blocks.extend_from_slice(&content.blocks[end + 1..]);
    (content.with_blocks(blocks), caret)
}

/// Split the block at the selection (removing a selected range first).
///
/// The head keeps the original key. The tail gets a new key, the same type
/// and depth, and empty data, so a checkable tail starts unchecked. The
/// caret lands at the start of the tail.
pub fn split_block(
    content: &ContentState,
    selection: &SelectionState,
) -> (ContentState, SelectionState) {
    let (content, caret) = remove_range(content, selection);
    let index = content.expect_index(caret.anchor_key);
    let block = &content.blocks[index];
    let ((head, head_characters), (tail, tail_characters)) = block.split_at(caret.anchor_offset);

    let tail_block = ContentBlock {
        key: BlockKey::generate(),
        kind: block.kind,
        depth: block.depth,
        text: tail,
        characters: tail_characters,
        data: BlockData::default(),
    };
    let tail_key = tail_block.key;

    let mut blocks = content.blocks.as_ref().clone();
    blocks[index] = Arc::new(block.with_content(head, head_characters));
    blocks.insert(index + 1, Arc::new(tail_block));
    (
        content.with_blocks(blocks),
        SelectionState::collapsed(tail_key, 0).with_focus(caret.has_focus),
    )
}

pub fn apply_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: InlineStyle,
) -> ContentState {
    map_selected(content, selection, |block, range| {
        block.map_characters(range, |meta| CharacterMetadata {
            style: meta.style.with(style),
            ..meta
        })
    })
}

pub fn remove_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: InlineStyle,
) -> ContentState {
    map_selected(content, selection, |block, range| {
        block.map_characters(range, |meta| CharacterMetadata {
            style: meta.style.without(style),
            ..meta
        })
    })
}

/// Set the type of every selected block. Non-list types drop depth to 0.
pub fn set_block_type(
    content: &ContentState,
    selection: &SelectionState,
    kind: BlockType,
) -> ContentState {
    map_selected(content, selection, |block, _| block.clone().with_kind(kind))
}

/// Shift the depth of every selected list item by `delta`, clamped to
/// `0..=max_depth`. Other blocks are left alone.
pub fn adjust_block_depth(
    content: &ContentState,
    selection: &SelectionState,
    delta: i32,
    max_depth: u8,
) -> ContentState {
    map_selected(content, selection, |block, _| {
        if !block.kind.is_list_item() {
            return block.clone();
        }
        let depth = (i32::from(block.depth) + delta).clamp(0, i32::from(max_depth));
        block.clone().with_depth(depth as u8)
    })
}

/// # Panics
/// If `key` is unknown or the block is not a list item and `depth` is not 0.
pub fn set_block_depth(content: &ContentState, key: BlockKey, depth: u8) -> ContentState {
    let block = content.block(key);
    assert!(
        depth == 0 || block.kind.is_list_item(),
        "block {key} of type {} cannot have depth {depth}",
        block.kind
    );
    content.with_block(block.clone().with_depth(depth))
}

/// Replace the data of one block.
pub fn set_block_data(content: &ContentState, key: BlockKey, data: BlockData) -> ContentState {
    content.with_block(content.block(key).clone().with_data(data))
}

/// Add an entity to the revision's map. Nothing references it yet.
pub fn create_entity(content: &ContentState, entity: Entity) -> (ContentState, EntityKey) {
    content.with_entity(entity)
}

/// Point every selected char at `entity`, or clear it with `None`.
pub fn apply_entity(
    content: &ContentState,
    selection: &SelectionState,
    entity: Option<EntityKey>,
) -> ContentState {
    if let Some(key) = entity {
        assert!(
            content.entity(key).is_some(),
            "unknown entity key {key}"
        );
    }
    map_selected(content, selection, |block, range| {
        block.map_characters(range, |meta| CharacterMetadata { entity, ..meta })
    })
}

/// Paste the blocks of `fragment` at the selection.
///
/// A one-block fragment is spliced into the target block's text. A longer
/// fragment splits the target: its head absorbs the first fragment block,
/// the middle blocks are inserted whole, and the last fragment block
/// absorbs the target's tail. When the target block is empty it takes the
/// first fragment block's type. Fragment entities are copied under new
/// keys and pasted blocks get new keys.
pub fn replace_with_fragment(
    content: &ContentState,
    selection: &SelectionState,
    fragment: &ContentState,
) -> (ContentState, SelectionState) {
    let (mut content, caret) = remove_range(content, selection);

    let mut remapped = BTreeMap::new();
    for (key, entity) in fragment.entities() {
        let (next, new_key) = content.with_entity(entity.clone());
        content = next;
        remapped.insert(key, new_key);
    }
    let mut pasted: Vec<ContentBlock> = fragment
        .blocks()
        .map(|block| ContentBlock {
            key: BlockKey::generate(),
            characters: block
                .characters
                .iter()
                .map(|meta| CharacterMetadata {
                    entity: meta.entity.and_then(|key| remapped.get(&key).copied()),
                    ..*meta
                })
                .collect(),
            ..block.clone()
        })
        .collect();

    let index = content.expect_index(caret.anchor_key);
    let target = &content.blocks[index];
    let ((mut head, mut head_characters), (tail, tail_characters)) =
        target.split_at(caret.anchor_offset);

    let first = pasted.remove(0);
    head.push_str(&first.text);
    head_characters.extend_from_slice(&first.characters);
    let mut head_block = target.with_content(head, head_characters);
    if target.is_empty() {
        head_block = head_block
            .with_kind(first.kind)
            .with_depth(first.depth)
            .with_data(first.data.clone());
    }

    let mut blocks = content.blocks.as_ref().clone();
    let caret = match pasted.pop() {
        None => {
            let offset = head_block.len();
            let mut text = head_block.text.clone();
            let mut characters = head_block.characters.clone();
            text.push_str(&tail);
            characters.extend(tail_characters);
            let key = head_block.key;
            blocks[index] = Arc::new(head_block.with_content(text, characters));
            SelectionState::collapsed(key, offset)
        }
        Some(mut last) => {
            let offset = last.len();
            last.text.push_str(&tail);
            last.characters.extend(tail_characters);
            let key = last.key;
            blocks[index] = Arc::new(head_block);
            let inserted = pasted.into_iter().chain(std::iter::once(last)).map(Arc::new);
            blocks.splice(index + 1..index + 1, inserted);
            SelectionState::collapsed(key, offset)
        }
    };
    (content.with_blocks(blocks), caret.with_focus(selection.has_focus))
}

/// The selected part of the document as a standalone revision, carrying
/// only the entities the selected text references.
pub fn get_fragment(content: &ContentState, selection: &SelectionState) -> ContentState {
    let start = content.expect_index(selection.start_key());
    let end = content.expect_index(selection.end_key());
    let blocks: Vec<ContentBlock> = (start..=end)
        .map(|index| {
            let block = &content.blocks[index];
            let from = if index == start {
                selection.start_offset()
            } else {
                0
            };
            let to = if index == end {
                selection.end_offset()
            } else {
                block.len()
            };
            block.with_content(
                block.slice(from..to).to_string(),
                block.characters[from..to].to_vec(),
            )
        })
        .collect();

    let entities = blocks
        .iter()
        .flat_map(|block| block.characters.iter().filter_map(|meta| meta.entity))
        .filter_map(|key| content.entity(key).map(|entity| (key, entity.clone())))
        .collect();
    ContentState::from_parts(blocks, entities)
}
