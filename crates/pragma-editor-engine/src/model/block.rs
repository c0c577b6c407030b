use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use uuid::Uuid;

use crate::model::{EntityKey, InlineStyle, StyleSet};

/// Stable identity of a block. Survives every edit except the split that
/// creates a new block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockKey(Uuid);

impl BlockKey {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// The closed set of block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    UnorderedListItem,
    OrderedListItem,
    /// List item with a checkbox; `checked` lives in the block data
    CheckableListItem,
    Blockquote,
    CodeBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

impl BlockType {
    pub const ALL: [BlockType; 12] = [
        BlockType::Unstyled,
        BlockType::HeaderOne,
        BlockType::HeaderTwo,
        BlockType::HeaderThree,
        BlockType::HeaderFour,
        BlockType::HeaderFive,
        BlockType::HeaderSix,
        BlockType::UnorderedListItem,
        BlockType::OrderedListItem,
        BlockType::CheckableListItem,
        BlockType::Blockquote,
        BlockType::CodeBlock,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::CheckableListItem => "checkable-list-item",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
        }
    }

    /// Unordered, ordered and checkable items. Only these carry depth.
    pub fn is_list_item(self) -> bool {
        matches!(
            self,
            BlockType::UnorderedListItem | BlockType::OrderedListItem | BlockType::CheckableListItem
        )
    }

    /// Heading level 1-6, if this is a heading.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            BlockType::HeaderOne => Some(1),
            BlockType::HeaderTwo => Some(2),
            BlockType::HeaderThree => Some(3),
            BlockType::HeaderFour => Some(4),
            BlockType::HeaderFive => Some(5),
            BlockType::HeaderSix => Some(6),
            _ => None,
        }
    }

    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(BlockType::HeaderOne),
            2 => Some(BlockType::HeaderTwo),
            3 => Some(BlockType::HeaderThree),
            4 => Some(BlockType::HeaderFour),
            5 => Some(BlockType::HeaderFive),
            6 => Some(BlockType::HeaderSix),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    Bool(bool),
    Text(String),
}

/// Opaque per-block key/value data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockData(BTreeMap<String, DataValue>);

impl BlockData {
    pub const CHECKED: &'static str = "checked";

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.0.get(key)
    }

    pub fn with(mut self, key: impl Into<String>, value: DataValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Data for a checkable item.
    pub fn checked(checked: bool) -> Self {
        Self::default().with(Self::CHECKED, DataValue::Bool(checked))
    }

    /// The `checked` flag; absent means unchecked.
    pub fn is_checked(&self) -> bool {
        matches!(self.get(Self::CHECKED), Some(DataValue::Bool(true)))
    }
}

/// Style and entity of a single character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterMetadata {
    pub style: StyleSet,
    pub entity: Option<EntityKey>,
}

impl CharacterMetadata {
    pub fn new(style: StyleSet, entity: Option<EntityKey>) -> Self {
        Self { style, entity }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineStyleRange {
    pub style: InlineStyle,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRange {
    pub key: EntityKey,
    pub offset: usize,
    pub length: usize,
}

/// One structural unit of the document.
///
/// Text offsets are counted in `char`s. `characters` always has one entry
/// per char of `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub(crate) key: BlockKey,
    pub(crate) kind: BlockType,
    pub(crate) depth: u8,
    pub(crate) text: String,
    pub(crate) characters: Vec<CharacterMetadata>,
    pub(crate) data: BlockData,
}

impl ContentBlock {
    /// A block with a fresh key and unstyled text.
    pub fn new(kind: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let characters = vec![CharacterMetadata::default(); text.chars().count()];
        Self {
            key: BlockKey::generate(),
            kind,
            depth: 0,
            text,
            characters,
            data: BlockData::default(),
        }
    }

    pub fn empty(kind: BlockType) -> Self {
        Self::new(kind, "")
    }

    /// Build from text and matching per-character metadata.
    ///
    /// # Panics
    /// If `characters` does not have one entry per char of `text`.
    pub fn with_characters(
        kind: BlockType,
        text: impl Into<String>,
        characters: Vec<CharacterMetadata>,
    ) -> Self {
        let text = text.into();
        assert_eq!(
            text.chars().count(),
            characters.len(),
            "character metadata must cover the block text exactly"
        );
        Self {
            characters,
            text,
            ..Self::empty(kind)
        }
    }

    pub fn with_key(mut self, key: BlockKey) -> Self {
        self.key = key;
        self
    }

    pub fn with_kind(mut self, kind: BlockType) -> Self {
        self.kind = kind;
        if !kind.is_list_item() {
            self.depth = 0;
        }
        self
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_data(mut self, data: BlockData) -> Self {
        self.data = data;
        self
    }

    pub fn key(&self) -> BlockKey {
        self.key
    }

    pub fn kind(&self) -> BlockType {
        self.kind
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn data(&self) -> &BlockData {
        &self.data
    }

    pub fn characters(&self) -> &[CharacterMetadata] {
        &self.characters
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.characters
            .get(offset)
            .map(|meta| meta.style)
            .unwrap_or_default()
    }

    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.characters.get(offset).and_then(|meta| meta.entity)
    }

    /// Text between two char offsets.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = byte_index(&self.text, range.start);
        let end = byte_index(&self.text, range.end);
        &self.text[start..end]
    }

    /// Maximal runs of each style, ordered by offset then style.
    pub fn inline_style_ranges(&self) -> Vec<InlineStyleRange> {
        let mut ranges = Vec::new();
        for style in InlineStyle::ALL {
            let mut start = None;
            for (offset, meta) in self.characters.iter().enumerate() {
                match (meta.style.contains(style), start) {
                    (true, None) => start = Some(offset),
                    (false, Some(run_start)) => {
                        ranges.push(InlineStyleRange {
                            style,
                            offset: run_start,
                            length: offset - run_start,
                        });
                        start = None;
                    }
                    _ => {}
                }
            }
            if let Some(run_start) = start {
                ranges.push(InlineStyleRange {
                    style,
                    offset: run_start,
                    length: self.len() - run_start,
                });
            }
        }
        ranges.sort_by_key(|range| (range.offset, range.style));
        ranges
    }

    /// Maximal runs of characters sharing one entity.
    pub fn entity_ranges(&self) -> Vec<EntityRange> {
        runs(&self.characters, |meta| meta.entity)
            .into_iter()
            .filter_map(|(entity, range)| {
                entity.map(|key| EntityRange {
                    key,
                    offset: range.start,
                    length: range.len(),
                })
            })
            .collect()
    }

    /// Split text and metadata at a char offset.
    pub(crate) fn split_at(&self, offset: usize) -> (TextPart, TextPart) {
        assert!(
            offset <= self.len(),
            "offset {offset} out of range for block {} of length {}",
            self.key,
            self.len()
        );
        let byte = byte_index(&self.text, offset);
        (
            (self.text[..byte].to_string(), self.characters[..offset].to_vec()),
            (self.text[byte..].to_string(), self.characters[offset..].to_vec()),
        )
    }

    /// Replace text and metadata, keeping key, kind, depth and data.
    pub(crate) fn with_content(&self, text: String, characters: Vec<CharacterMetadata>) -> Self {
        debug_assert_eq!(text.chars().count(), characters.len());
        Self {
            text,
            characters,
            ..self.clone()
        }
    }

    /// Apply `f` to the metadata of every char in `range`.
    pub(crate) fn map_characters(
        &self,
        range: Range<usize>,
        f: impl Fn(CharacterMetadata) -> CharacterMetadata,
    ) -> Self {
        assert!(
            range.end <= self.len(),
            "range {range:?} out of range for block {} of length {}",
            self.key,
            self.len()
        );
        let mut characters = self.characters.clone();
        for meta in &mut characters[range] {
            *meta = f(*meta);
        }
        Self {
            characters,
            ..self.clone()
        }
    }
}

/// Text with its per-char metadata, as produced by splitting a block.
pub(crate) type TextPart = (String, Vec<CharacterMetadata>);

/// Byte index of a char offset. Offsets past the end clamp to the length.
pub(crate) fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Group consecutive characters by `key`, returning each run's value and
/// char range.
pub(crate) fn runs<K: PartialEq>(
    characters: &[CharacterMetadata],
    key: impl Fn(&CharacterMetadata) -> K,
) -> Vec<(K, Range<usize>)> {
    let mut runs: Vec<(K, Range<usize>)> = Vec::new();
    for (offset, meta) in characters.iter().enumerate() {
        let value = key(meta);
        match runs.last_mut() {
            Some((current, range)) if *current == value => range.end = offset + 1,
            _ => runs.push((value, offset..offset + 1)),
        }
    }
    runs
}
