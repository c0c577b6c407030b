use std::fmt;
use std::ops::Range;

use crate::model::{ContentBlock, ContentState, EntityType};

/// A run of block text the view should render specially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Char range within the block
    pub range: Range<usize>,
    pub kind: DecorationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    Link { url: String },
}

/// Finds decorated ranges in a block at render time.
pub trait Decorator: fmt::Debug + Send + Sync {
    fn decorate(&self, content: &ContentState, block: &ContentBlock) -> Vec<Decoration>;
}

/// Decorates text covered by `LINK` entities with the link's URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkDecorator;

impl Decorator for LinkDecorator {
    fn decorate(&self, content: &ContentState, block: &ContentBlock) -> Vec<Decoration> {
        block
            .entity_ranges()
            .into_iter()
            .filter_map(|range| {
                let entity = content.entity(range.key)?;
                (entity.kind() == EntityType::Link).then(|| Decoration {
                    range: range.offset..range.offset + range.length,
                    kind: DecorationKind::Link {
                        url: entity.data().url.clone(),
                    },
                })
            })
            .collect()
    }
}
