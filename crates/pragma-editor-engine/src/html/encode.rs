//! Document model to HTML.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::block::runs;
use crate::model::{BlockType, ContentBlock, ContentState, Entity, InlineStyle, StyleSet};

/// A list wrapper that is currently open in the output.
struct OpenList {
    tag: &'static str,
    /// An `<li>` in this list has not been closed yet, so a deeper list
    /// nests inside it
    item_open: bool,
}

/// Serialize a revision to HTML.
///
/// Consecutive list items share `<ul>`/`<ol>` wrappers and deeper items
/// nest inside the preceding `<li>`.
pub fn to_html(content: &ContentState) -> String {
    let mut html = String::new();
    let mut lists: Vec<OpenList> = Vec::new();

    for block in content.blocks() {
        if block.kind().is_list_item() {
            open_list_item(&mut html, &mut lists, block);
            if block.kind() == BlockType::CheckableListItem {
                html.push_str(if block.data().is_checked() {
                    r#"<input type="checkbox" checked>"#
                } else {
                    r#"<input type="checkbox">"#
                });
            }
            write_inline(&mut html, content, block);
        } else {
            close_lists(&mut html, &mut lists, 0);
            let tag = block_tag(block.kind());
            html.push('<');
            html.push_str(tag);
            html.push('>');
            write_inline(&mut html, content, block);
            html.push_str("</");
            html.push_str(tag);
            html.push('>');
        }
    }
    close_lists(&mut html, &mut lists, 0);

    html
}

fn block_tag(kind: BlockType) -> &'static str {
    match kind {
        BlockType::HeaderOne => "h1",
        BlockType::HeaderTwo => "h2",
        BlockType::HeaderThree => "h3",
        BlockType::HeaderFour => "h4",
        BlockType::HeaderFive => "h5",
        BlockType::HeaderSix => "h6",
        BlockType::Blockquote => "blockquote",
        BlockType::CodeBlock => "pre",
        // List items are written as `<li>` by `open_list_item`
        BlockType::Unstyled
        | BlockType::UnorderedListItem
        | BlockType::OrderedListItem
        | BlockType::CheckableListItem => "p",
    }
}

fn list_tag(kind: BlockType) -> &'static str {
    match kind {
        BlockType::OrderedListItem => "ol",
        _ => "ul",
    }
}

fn style_tag(style: InlineStyle) -> &'static str {
    match style {
        InlineStyle::Bold => "strong",
        InlineStyle::Italic => "em",
        InlineStyle::Underline => "u",
        InlineStyle::Code => "code",
        InlineStyle::Strikethrough => "del",
        InlineStyle::Mark => "mark",
    }
}

/// Close open lists until `keep` remain.
fn close_lists(html: &mut String, lists: &mut Vec<OpenList>, keep: usize) {
    while lists.len() > keep {
        if let Some(list) = lists.pop() {
            if list.item_open {
                html.push_str("</li>");
            }
            html.push_str("</");
            html.push_str(list.tag);
            html.push('>');
        }
    }
}

/// Get the wrappers right for `block` and open its `<li>`.
fn open_list_item(html: &mut String, lists: &mut Vec<OpenList>, block: &ContentBlock) {
    let tag = list_tag(block.kind());
    let level = usize::from(block.depth()) + 1;

    close_lists(html, lists, level);
    if lists.len() == level {
        let wrong_wrapper = lists.last().is_some_and(|list| list.tag != tag);
        if wrong_wrapper {
            close_lists(html, lists, level - 1);
        } else if let Some(list) = lists.last_mut() {
            if list.item_open {
                html.push_str("</li>");
                list.item_open = false;
            }
        }
    }
    while lists.len() < level {
        html.push('<');
        html.push_str(tag);
        html.push('>');
        lists.push(OpenList {
            tag,
            item_open: false,
        });
    }

    html.push_str("<li>");
    if let Some(list) = lists.last_mut() {
        list.item_open = true;
    }
}

/// Write block text with link and style markup.
fn write_inline(html: &mut String, content: &ContentState, block: &ContentBlock) {
    let code_block = block.kind() == BlockType::CodeBlock;
    let characters = block.characters();

    let link_runs = runs(characters, |meta| {
        meta.entity
            .filter(|key| content.entity(*key).and_then(Entity::url).is_some())
    });
    for (link, range) in link_runs {
        let url = link.and_then(|key| content.entity(key)).and_then(Entity::url);
        if let Some(url) = url {
            html.push_str(r#"<a href=""#);
            html.push_str(&encode_double_quoted_attribute(url));
            html.push_str(r#"">"#);
        }

        // `<pre>` already renders as code
        let style_of = |style: StyleSet| {
            if code_block {
                style.without(InlineStyle::Code)
            } else {
                style
            }
        };
        for (style, sub_range) in runs(&characters[range.clone()], |meta| style_of(meta.style)) {
            let start = range.start + sub_range.start;
            let end = range.start + sub_range.end;
            for style in style.iter() {
                html.push('<');
                html.push_str(style_tag(style));
                html.push('>');
            }
            write_text(html, block.slice(start..end), code_block);
            for style in style.iter().collect::<Vec<_>>().into_iter().rev() {
                html.push_str("</");
                html.push_str(style_tag(style));
                html.push('>');
            }
        }

        if url.is_some() {
            html.push_str("</a>");
        }
    }
}

fn write_text(html: &mut String, text: &str, code_block: bool) {
    if code_block {
        html.push_str(&encode_text(text));
        return;
    }
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            html.push_str("<br>");
        }
        html.push_str(&encode_text(line));
    }
}
