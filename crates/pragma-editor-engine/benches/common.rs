// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_note_html(sections: usize) -> String {
    let base = "<h2>Section</h2>\
                <p>Paragraph with <strong>bold</strong>, <em>italic</em> and a \
                <a href=\"https://example.com/page?id=1&amp;x=2\">link</a>.</p>\
                <ul><li>Bullet point<ul><li>Nested item</li></ul></li>\
                <li><input type=\"checkbox\" checked>Done task</li></ul>\
                <ol><li>First</li><li><del>Second</del> <mark>third</mark></li></ol>\
                <pre>fn example() {\n    println!(\"Hello\");\n}</pre>";
    base.repeat(sections)
}

#[allow(dead_code)]
pub fn generate_foreign_html(paragraphs: usize) -> String {
    let mut html = String::from("<html><head><title>Export</title><style>p{}</style></head><body>");
    for index in 0..paragraphs {
        html.push_str(&format!(
            "<div class=\"para-{index}\">\n  <p><span style=\"color:red\"><b>Item {index}</b></span> \
             with&nbsp;<i>entities</i> &amp; <font>legacy</font> tags</p>\n</div>\n"
        ));
    }
    html.push_str("</body></html>");
    html
}
