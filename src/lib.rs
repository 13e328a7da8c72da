//! draftmark: line-oriented Markdown to HTML renderer for preview panes.
//!
//! This crate converts a constrained Markdown dialect into an HTML
//! fragment suitable for direct injection into a styled preview
//! container.
//!
//! # Design Principles
//! - Four ordered rewrite stages; later stages assume earlier ones ran
//! - No regex: byte-level scanning with `memchr`
//! - Total function: malformed input degrades to literal text, never errors
//! - No shared state: every call owns its placeholder table and list stack
//!
//! # Pipeline
//! 1. [`protect`]: fenced code blocks, then inline code spans, swapped
//!    for opaque placeholder tokens
//! 2. [`inline`]: rules, bold, italic, headings, links, in that order
//! 3. [`list`]: the list-structure state machine over physical lines
//! 4. [`paragraph`]: paragraph wrapping, cleanup, placeholder restoration

pub mod inline;
pub mod list;
pub mod paragraph;
pub mod protect;
pub mod render;

// Re-export primary types
pub use list::ListKind;
pub use protect::Protected;
pub use render::HtmlWriter;

/// Convert Markdown to an HTML fragment.
///
/// This is the single entry point. The output does not escape raw angle
/// brackets outside recognized constructs; sanitizing untrusted input is
/// the caller's responsibility.
///
/// # Example
/// ```
/// let html = draftmark::render("# Hello\n\nWorld");
/// assert!(html.contains("<h1>Hello</h1>"));
/// assert!(html.contains("<p>World</p>"));
/// ```
pub fn render(input: &str) -> String {
    let (text, protected) = protect::extract(input);
    let text = inline::transform(&text);
    let text = list::transform(&text);
    paragraph::finish(&text, &protected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, world!"), "<p>Hello, world!</p>");
    }

    #[test]
    fn test_multiline_paragraph() {
        assert_eq!(render("Line 1\nLine 2\nLine 3"), "<p>Line 1<br />Line 2<br />Line 3</p>");
    }

    #[test]
    fn test_multiple_paragraphs() {
        let html = render("First\n\nSecond");
        assert!(html.contains("<p>First</p>"));
        assert!(html.contains("<p>Second</p>"));
    }

    #[test]
    fn test_heading_h1() {
        assert_eq!(render("# Hello"), "<h1>Hello</h1>");
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=3 {
            let input = format!("{} Heading", "#".repeat(level));
            let html = render(&input);
            assert!(
                html.contains(&format!("<h{level}>Heading</h{level}>")),
                "Failed for level {level}: {html}"
            );
        }
    }

    #[test]
    fn test_four_hashes_stay_literal() {
        assert_eq!(render("#### Deep"), "<p>#### Deep</p>");
    }

    #[test]
    fn test_heading_and_paragraph() {
        let html = render("# Title\n\nContent here.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Content here.</p>"));
    }

    #[test]
    fn test_thematic_break() {
        assert_eq!(render("---"), "<hr />");
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(render("a **b** *c*"), "<p>a <strong>b</strong> <em>c</em></p>");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render("[docs](https://docs.rs)"),
            "<p><a href=\"https://docs.rs\" target=\"_blank\" rel=\"noopener noreferrer\">docs</a></p>"
        );
    }

    #[test]
    fn test_inline_code_protected_from_emphasis() {
        assert_eq!(render("use `*x*` now"), "<p>use <code>*x*</code> now</p>");
    }

    #[test]
    fn test_code_block_in_document() {
        let html = render("text\n\n```\ncode\n```\n\nafter");
        assert_eq!(
            html,
            "<p>text</p>\n<pre><code>code</code></pre>\n<p>after</p>"
        );
    }

    #[test]
    fn test_unterminated_fence_consumes_to_end() {
        assert_eq!(render("```\nabc"), "\n<pre><code>abc</code></pre>\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_only_whitespace() {
        let html = render("   \n\n   ");
        assert!(html.trim().is_empty());
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn test_complex_document() {
        let input = r#"# Main Title

This is the first paragraph.

## Section 1

* point one
* point two

---

## Section 2

Final paragraph with `code`."#;

        let html = render(input);

        assert!(html.contains("<h1>Main Title</h1>"));
        assert!(html.contains("<h2>Section 1</h2>"));
        assert!(html.contains("<h2>Section 2</h2>"));
        assert!(html.contains("<hr />"));
        assert!(html.contains("<li>point one</li>"));
        assert!(html.contains("<code>code</code>"));
        assert!(html.contains("<p>This is the first paragraph.</p>"));
        assert!(!html.contains("__CODE_"));
    }
}
