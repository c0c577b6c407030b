use std::fmt;

/// Key of an entity inside one content revision's entity map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(pub(crate) u32);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Link,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Link => "LINK",
        }
    }
}

/// How text covered by an entity behaves when edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
    /// Text may be edited freely; the entity stays on the remaining text
    Mutable,
    /// Text is atomic
    Immutable,
    /// Text is deleted word by word
    Segmented,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityData {
    pub url: String,
}

/// Out-of-band annotation referenced by character ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    kind: EntityType,
    mutability: Mutability,
    data: EntityData,
}

impl Entity {
    pub fn new(kind: EntityType, mutability: Mutability, data: EntityData) -> Self {
        Self {
            kind,
            mutability,
            data,
        }
    }

    /// A mutable hyperlink.
    pub fn link(url: impl Into<String>) -> Self {
        Self::new(
            EntityType::Link,
            Mutability::Mutable,
            EntityData { url: url.into() },
        )
    }

    pub fn kind(&self) -> EntityType {
        self.kind
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn data(&self) -> &EntityData {
        &self.data
    }

    /// URL of a link entity.
    pub fn url(&self) -> Option<&str> {
        match self.kind {
            EntityType::Link => Some(self.data.url.as_str()),
        }
    }
}
