//! The document model: blocks, inline styles, entities and selection,
//! collected into immutable revisions and wrapped in an [`EditorState`]
//! that carries undo history.

pub mod block;
pub mod content;
pub mod decorator;
pub mod editor_state;
pub mod entity;
pub mod modifier;
pub mod selection;
pub mod style;

pub use block::{
    BlockData, BlockKey, BlockType, CharacterMetadata, ContentBlock, DataValue, EntityRange,
    InlineStyleRange, UnknownBlockType,
};
pub use content::ContentState;
pub use decorator::{Decoration, DecorationKind, Decorator, LinkDecorator};
pub use editor_state::{EditKind, EditorState, MAX_UNDO_DEPTH};
pub use entity::{Entity, EntityData, EntityKey, EntityType, Mutability};
pub use selection::SelectionState;
pub use style::{InlineStyle, StyleSet, UnknownInlineStyle};
