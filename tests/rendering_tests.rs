//! End-to-end rendering tests for the documented output contract.

use draftmark::render;

#[test]
fn plain_text_wraps_in_one_paragraph() {
    assert_eq!(render("just some text"), "<p>just some text</p>");
}

#[test]
fn internal_newlines_become_line_breaks() {
    assert_eq!(render("one\ntwo\nthree"), "<p>one<br />two<br />three</p>");
}

#[test]
fn fenced_code_is_never_transformed() {
    let html = render("```\n*a* **b** - c\n```");
    assert!(html.contains("<pre><code>*a* **b** - c</code></pre>"), "{html}");
    assert!(!html.contains("<strong>"));
    assert!(!html.contains("<em>"));
    assert!(!html.contains("<li>"));
}

#[test]
fn nested_list_keeps_one_outer_list() {
    let html = render("* top\n  * nested\n* top2");
    assert_eq!(
        html,
        "<ul>\n<li>top</li>\n<ul>\n<li>nested</li>\n</ul>\n<li>top2</li>\n</ul>"
    );
    // Balanced: opens == closes.
    assert_eq!(html.matches("<ul>").count(), 2);
    assert_eq!(html.matches("</ul>").count(), 2);
    // Exactly one outer list.
    assert!(html.starts_with("<ul>"));
    assert!(html.ends_with("</ul>"));
}

#[test]
fn ordered_list_preserves_explicit_restart() {
    let html = render("5. five\n6. six");
    assert_eq!(html, "<ol start=\"5\">\n<li>five</li>\n<li>six</li>\n</ol>");
}

#[test]
fn mixed_kinds_at_same_level_split_into_two_lists() {
    let html = render("* a\n1. b");
    assert_eq!(
        html,
        "<ul>\n<li>a</li>\n</ul>\n<ol start=\"1\">\n<li>b</li>\n</ol>"
    );
}

#[test]
fn heading_is_not_wrapped_in_paragraph() {
    assert_eq!(render("# Title"), "<h1>Title</h1>");
}

#[test]
fn empty_input_has_no_paragraph() {
    assert_eq!(render(""), "");
}

#[test]
fn triple_asterisks_nest_bold_around_italic() {
    assert_eq!(render("***x***"), "<p><strong><em>x</em></strong></p>");
}

#[test]
fn unmatched_bold_stays_literal() {
    assert_eq!(render("a ** b"), "<p>a ** b</p>");
}

#[test]
fn unterminated_span_stays_literal() {
    assert_eq!(render("a ` b"), "<p>a ` b</p>");
}

#[test]
fn placeholders_never_leak_from_mixed_document() {
    let input = "# T\n\n`span` and more\n\n```\nblock\n```\n\n* item with `code`\n\ntail";
    let html = render(input);
    assert!(!html.contains("__CODE_BLOCK_"), "{html}");
    assert!(!html.contains("__CODE_SPAN_"), "{html}");
}

#[test]
fn code_block_is_not_nested_inside_list() {
    let html = render("* item\n```\ncode\n```");
    let pre = html.find("<pre>").unwrap();
    let close_ul = html.find("</ul>").unwrap();
    assert!(close_ul < pre, "list must close before the code block: {html}");
}

#[test]
fn fence_collects_language_line_as_content() {
    // The dialect has no info strings; the whole fenced region is content.
    let html = render("```rust\nfn x() {}\n```");
    assert!(html.contains("<pre><code>rust\nfn x() {}</code></pre>"));
}

#[test]
fn rule_between_paragraphs() {
    let html = render("a\n\n---\n\nb");
    assert_eq!(html, "<p>a</p>\n<hr />\n<p>b</p>");
}

#[test]
fn link_inside_list_item() {
    let html = render("* see [docs](https://docs.rs)");
    assert!(html.contains(
        "<li>see <a href=\"https://docs.rs\" target=\"_blank\" rel=\"noopener noreferrer\">docs</a></li>"
    ));
}

#[test]
fn concurrent_renders_do_not_interfere() {
    let inputs = ["# a\n\n`one`", "* x\n* y", "```\nz\n```"];
    let handles: Vec<_> = inputs
        .iter()
        .copied()
        .map(|input| std::thread::spawn(move || (render(input), render(input))))
        .collect();
    for handle in handles {
        let (first, second) = handle.join().unwrap();
        assert_eq!(first, second);
    }
}
