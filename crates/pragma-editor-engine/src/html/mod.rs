//! Conversion between the document model and the HTML notes are stored as.
//!
//! | Model                 | HTML                                           |
//! |-----------------------|------------------------------------------------|
//! | `unstyled`            | `<p>`                                          |
//! | `header-one`..`six`   | `<h1>`..`<h6>`                                 |
//! | `blockquote`          | `<blockquote>`                                 |
//! | `code-block`          | `<pre>`                                        |
//! | list items            | `<li>` in `<ul>`/`<ol>`, nested by depth       |
//! | `checkable-list-item` | `<li><input type="checkbox" [checked]>` in `<ul>` |
//! | `BOLD`                | `<strong>` (also reads `<b>`)                  |
//! | `ITALIC`              | `<em>` (also reads `<i>`)                      |
//! | `UNDERLINE`           | `<u>`                                          |
//! | `CODE`                | `<code>`                                       |
//! | `STRIKETHROUGH`       | `<del>` (also reads `<s>`, `<strike>`)         |
//! | `MARK`                | `<mark>`                                       |
//! | `LINK` entity         | `<a href="...">`                               |
//!
//! Serializing what was parsed from serialized output reproduces that output
//! exactly, so HTML written by the editor is stable across load/save cycles.

mod decode;
mod encode;

pub use decode::from_html;
pub use encode::to_html;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockType, ContentBlock, ContentState, Entity, InlineStyle, modifier};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn normalize(html: &str) -> String {
        to_html(&from_html(html))
    }

    #[rstest]
    #[case::strikethrough("<p><del>x</del></p>")]
    #[case::mark("<p><mark>highlight</mark> me</p>")]
    #[case::checked("<ul><li><input type=\"checkbox\" checked>done</li></ul>")]
    #[case::unchecked("<ul><li><input type=\"checkbox\">todo</li></ul>")]
    #[case::link("<p>go <a href=\"https://example.com\">there</a></p>")]
    #[case::nested_lists("<ul><li>a<ol><li>b</li></ol></li><li>c</li></ul>")]
    #[case::code_block("<pre>fn main() {\n    println!(\"&lt;hi&gt;\");\n}</pre>")]
    #[case::line_break("<h1>one<br>two</h1>")]
    fn test_editor_output_is_reproduced_exactly(#[case] html: &str) {
        assert_eq!(normalize(html), html);
    }

    #[rstest]
    #[case::foreign_markup("<div class=\"x\"><b>Bold</b> and <i>it</i></div><span>loose</span>")]
    #[case::messy_lists("<ul>\n<li><p>one</p><ul><ul><li>deep</li></ul></ul></li>\n<li><input type=checkbox CHECKED>x</li></ul>")]
    #[case::mis_nested("<p><b>a<i>b</b>c</i><p>d")]
    #[case::pre_with_code("<pre><code>x\ny</code></pre><code>inline</code>")]
    #[case::empty("")]
    #[case::entities("<p>&lt;tag&gt; &amp;&nbsp;&quot;</p>")]
    #[case::script("<p>a<script>document.write('<p>')</script></p>")]
    fn test_normalization_is_idempotent(#[case] html: &str) {
        let once = normalize(html);

        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_strikethrough_roundtrip() {
        let content = from_html("<p><del>x</del></p>");
        let block = content.first_block();

        assert_eq!(block.text(), "x");
        assert!(block.style_at(0).contains(InlineStyle::Strikethrough));
        assert_eq!(to_html(&content), "<p><del>x</del></p>");
    }

    #[test]
    fn test_checkable_roundtrip() {
        let html = r#"<ul><li><input type="checkbox" checked>done</li></ul>"#;
        let content = from_html(html);

        assert_eq!(content.block_count(), 1);
        let block = content.first_block();
        assert_eq!(block.kind(), BlockType::CheckableListItem);
        assert!(block.data().is_checked());
        assert_eq!(block.text(), "done");
        assert_eq!(to_html(&content), html);
    }

    #[test]
    fn test_foreign_markup_snapshot() {
        let html = "<html><head><title>T</title><style>p{}</style></head><body>\n\
                    <h2>Shopping</h2>\n\
                    <ul>\n  <li><input type=checkbox checked> eggs</li>\n  <li>milk <s>cream</s></li>\n</ul>\n\
                    <p>See <a href='https://shop.example/list?a=1&amp;b=2'><b>the list</b></a></p>\n\
                    </body></html>";

        assert_snapshot!(normalize(html), @r#"<h2>Shopping</h2><ul><li><input type="checkbox" checked> eggs</li><li>milk <del>cream</del></li></ul><p>See <a href="https://shop.example/list?a=1&amp;b=2"><strong>the list</strong></a></p>"#);
    }

    #[test]
    fn test_model_roundtrip_snapshot() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new(BlockType::HeaderOne, "Notes"),
            ContentBlock::new(BlockType::UnorderedListItem, "first"),
            ContentBlock::new(BlockType::UnorderedListItem, "nested").with_depth(1),
            ContentBlock::new(BlockType::Unstyled, "read more"),
        ]);
        let last = content.last_block().key();
        let (content, link) = modifier::create_entity(&content, Entity::link("https://more.example"));
        let content = modifier::apply_entity(&content, &content.select((last, 5), (last, 9)), Some(link));

        let html = to_html(&content);

        assert_snapshot!(html, @r#"<h1>Notes</h1><ul><li>first<ul><li>nested</li></ul></li></ul><p>read <a href="https://more.example">more</a></p>"#);
        assert_eq!(normalize(&html), html);
    }
}
