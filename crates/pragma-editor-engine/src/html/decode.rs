//! HTML to document model.
//!
//! Walks the flat event stream from `pragma-editor-syntax` with an element
//! stack. Each open element has an [`Effect`] that says what it contributes
//! while open and what closing it does. Anything unrecognised is
//! transparent, so unknown markup degrades to its text.

use std::collections::BTreeMap;

use pragma_editor_syntax::{HtmlEvent, Tag};

use crate::model::{
    BlockData, BlockType, CharacterMetadata, ContentBlock, ContentState, Entity, EntityKey,
    InlineStyle, StyleSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    /// Started a block; closing finishes it
    Block,
    /// A block tag inside a block holding nothing but whitespace, merged
    /// into it
    Absorbed,
    List,
    Style(InlineStyle),
    Link(EntityKey),
    /// Contents are dropped
    Skip,
    Transparent,
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    effect: Effect,
}

#[derive(Debug)]
struct PendingBlock {
    kind: BlockType,
    depth: u8,
    data: BlockData,
    text: String,
    characters: Vec<CharacterMetadata>,
    /// Created for stray text rather than by a block tag
    implicit: bool,
}

impl PendingBlock {
    fn new(kind: BlockType, depth: u8, implicit: bool) -> Self {
        Self {
            kind,
            depth,
            data: BlockData::default(),
            text: String::new(),
            characters: Vec::new(),
            implicit,
        }
    }

    /// Strip whitespace from both ends, keeping metadata aligned.
    fn trim(&mut self) {
        let trimmed = self.text.trim_end();
        let end = trimmed.chars().count();
        let start = trimmed.chars().take_while(|c| c.is_whitespace()).count();
        self.text = trimmed.trim_start().to_string();
        self.characters.truncate(end);
        self.characters.drain(..start);
    }
}

#[derive(Debug, Default)]
struct Decoder {
    blocks: Vec<ContentBlock>,
    entities: BTreeMap<EntityKey, Entity>,
    next_entity: u32,
    current: Option<PendingBlock>,
    stack: Vec<OpenElement>,
}

/// Parse HTML into a revision. Never fails: unsupported markup becomes plain
/// text, and an empty document yields one empty paragraph.
pub fn from_html(html: &str) -> ContentState {
    let mut decoder = Decoder {
        next_entity: 1,
        ..Decoder::default()
    };
    for event in pragma_editor_syntax::parse(html) {
        match event {
            HtmlEvent::Start(tag) => decoder.start(tag),
            HtmlEvent::End(name) => decoder.end(&name),
            HtmlEvent::Text(text) => decoder.text(&text),
        }
    }
    decoder.finish_block();
    ContentState::from_parts(decoder.blocks, decoder.entities)
}

fn block_kind(name: &str) -> Option<BlockType> {
    match name {
        "p" | "div" => Some(BlockType::Unstyled),
        "h1" => Some(BlockType::HeaderOne),
        "h2" => Some(BlockType::HeaderTwo),
        "h3" => Some(BlockType::HeaderThree),
        "h4" => Some(BlockType::HeaderFour),
        "h5" => Some(BlockType::HeaderFive),
        "h6" => Some(BlockType::HeaderSix),
        "blockquote" => Some(BlockType::Blockquote),
        "pre" => Some(BlockType::CodeBlock),
        _ => None,
    }
}

fn inline_style(name: &str) -> Option<InlineStyle> {
    match name {
        "strong" | "b" => Some(InlineStyle::Bold),
        "em" | "i" => Some(InlineStyle::Italic),
        "u" => Some(InlineStyle::Underline),
        "code" => Some(InlineStyle::Code),
        "del" | "s" | "strike" => Some(InlineStyle::Strikethrough),
        "mark" => Some(InlineStyle::Mark),
        _ => None,
    }
}

impl Decoder {
    fn in_pre(&self) -> bool {
        self.stack.iter().any(|element| element.name == "pre")
    }

    fn skipping(&self) -> bool {
        self.stack.iter().any(|element| element.effect == Effect::Skip)
    }

    fn list_depth(&self) -> usize {
        self.stack
            .iter()
            .filter(|element| element.effect == Effect::List)
            .count()
    }

    fn current_style(&self) -> StyleSet {
        self.stack
            .iter()
            .filter_map(|element| match element.effect {
                Effect::Style(style) => Some(style),
                _ => None,
            })
            .collect()
    }

    fn current_entity(&self) -> Option<EntityKey> {
        self.stack.iter().rev().find_map(|element| match element.effect {
            Effect::Link(key) => Some(key),
            _ => None,
        })
    }

    fn finish_block(&mut self) {
        let Some(mut pending) = self.current.take() else {
            return;
        };
        if pending.implicit {
            pending.trim();
            if pending.text.is_empty() {
                return;
            }
        }
        let block = ContentBlock::with_characters(pending.kind, pending.text, pending.characters)
            .with_depth(pending.depth)
            .with_data(pending.data);
        self.blocks.push(block);
    }

    fn start_block(&mut self, kind: BlockType, depth: u8) {
        self.finish_block();
        self.current = Some(PendingBlock::new(kind, depth, false));
    }

    fn start(&mut self, tag: Tag) {
        if self.skipping() {
            return;
        }

        let effect = match tag.name.as_str() {
            "ul" | "ol" => {
                self.finish_block();
                Effect::List
            }
            "li" => {
                let ordered = self
                    .stack
                    .iter()
                    .rev()
                    .find(|element| element.effect == Effect::List)
                    .is_some_and(|list| list.name == "ol");
                let kind = if ordered {
                    BlockType::OrderedListItem
                } else {
                    BlockType::UnorderedListItem
                };
                let depth = self.list_depth().saturating_sub(1);
                self.start_block(kind, u8::try_from(depth).unwrap_or(u8::MAX));
                Effect::Block
            }
            "input" => {
                self.checkbox(&tag);
                return;
            }
            "br" => {
                self.push_text("\n");
                return;
            }
            "a" => match tag.attribute_value("href") {
                Some(href) => Effect::Link(self.create_link(href)),
                None => Effect::Transparent,
            },
            "code" if self.in_pre() => Effect::Transparent,
            "head" | "title" | "template" => Effect::Skip,
            name => {
                if let Some(kind) = block_kind(name) {
                    let absorb = self
                        .current
                        .as_ref()
                        .is_some_and(|pending| !pending.implicit && pending.text.trim().is_empty());
                    if absorb {
                        if let Some(pending) = self.current.as_mut() {
                            pending.text.clear();
                            pending.characters.clear();
                        }
                        Effect::Absorbed
                    } else {
                        self.start_block(kind, 0);
                        Effect::Block
                    }
                } else if let Some(style) = inline_style(name) {
                    Effect::Style(style)
                } else if tag.is_raw_text() {
                    Effect::Skip
                } else {
                    Effect::Transparent
                }
            }
        };

        if tag.is_void() || tag.self_closing {
            return;
        }
        self.stack.push(OpenElement {
            name: tag.name,
            effect,
        });
    }

    fn end(&mut self, name: &str) {
        let Some(position) = self.stack.iter().rposition(|element| element.name == name) else {
            return;
        };
        for element in self.stack.split_off(position).into_iter().rev() {
            if matches!(element.effect, Effect::Block | Effect::Absorbed) {
                self.finish_block();
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.skipping() {
            return;
        }
        if self.current.is_none() && text.trim().is_empty() {
            return;
        }
        if self.in_pre() {
            self.push_text(text);
        } else {
            self.push_text(&text.replace('\n', " "));
        }
    }

    fn push_text(&mut self, text: &str) {
        let meta = CharacterMetadata::new(self.current_style(), self.current_entity());
        let pending = self
            .current
            .get_or_insert_with(|| PendingBlock::new(BlockType::Unstyled, 0, true));
        pending.text.push_str(text);
        pending
            .characters
            .extend(std::iter::repeat_n(meta, text.chars().count()));
    }

    /// A checkbox inside a list item turns it into a checkable item.
    fn checkbox(&mut self, tag: &Tag) {
        let is_checkbox = tag
            .attribute_value("type")
            .is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox"));
        if !is_checkbox {
            return;
        }
        if let Some(pending) = self.current.as_mut() {
            if pending.kind.is_list_item() {
                pending.kind = BlockType::CheckableListItem;
                pending.data = BlockData::checked(tag.has_attribute("checked"));
            }
        }
    }

    fn create_link(&mut self, href: &str) -> EntityKey {
        let key = EntityKey(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(key, Entity::link(href));
        key
    }
}
