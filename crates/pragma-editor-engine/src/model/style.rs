use std::fmt;
use std::str::FromStr;

/// Inline styles that can be applied to ranges of block text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
    /// Highlighter pen
    Mark,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown inline style: {0}")]
pub struct UnknownInlineStyle(pub String);

impl InlineStyle {
    /// Every style, in the order nested HTML tags are opened.
    pub const ALL: [InlineStyle; 6] = [
        InlineStyle::Bold,
        InlineStyle::Italic,
        InlineStyle::Underline,
        InlineStyle::Code,
        InlineStyle::Strikethrough,
        InlineStyle::Mark,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InlineStyle::Bold => "BOLD",
            InlineStyle::Italic => "ITALIC",
            InlineStyle::Underline => "UNDERLINE",
            InlineStyle::Code => "CODE",
            InlineStyle::Strikethrough => "STRIKETHROUGH",
            InlineStyle::Mark => "MARK",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InlineStyle {
    type Err = UnknownInlineStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InlineStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownInlineStyle(s.to_string()))
    }
}

/// A set of inline styles, stored per character.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StyleSet(u8);

impl StyleSet {
    pub const EMPTY: StyleSet = StyleSet(0);

    pub fn contains(self, style: InlineStyle) -> bool {
        self.0 & style.bit() != 0
    }

    pub fn with(self, style: InlineStyle) -> Self {
        StyleSet(self.0 | style.bit())
    }

    pub fn without(self, style: InlineStyle) -> Self {
        StyleSet(self.0 & !style.bit())
    }

    pub fn toggled(self, style: InlineStyle) -> Self {
        if self.contains(style) {
            self.without(style)
        } else {
            self.with(style)
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Styles in [`InlineStyle::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = InlineStyle> {
        InlineStyle::ALL
            .into_iter()
            .filter(move |style| self.contains(*style))
    }
}

impl FromIterator<InlineStyle> for StyleSet {
    fn from_iter<I: IntoIterator<Item = InlineStyle>>(iter: I) -> Self {
        iter.into_iter().fold(StyleSet::EMPTY, StyleSet::with)
    }
}

impl fmt::Debug for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
