//! Paragraph wrapping and cleanup.
//!
//! The last rewrite stage: blank-line runs become paragraph boundaries,
//! remaining single newlines become line breaks, the whole text is wrapped
//! in one outer paragraph, paragraph tags around block-level elements are
//! stripped, empty paragraphs are dropped, and finally the protected
//! fragments are restored.

use memchr::memchr;

use crate::protect::{BLOCK_TOKEN_PREFIX, Protected};

/// Run the paragraph stage over the joined list-stage output and restore
/// the protected fragments.
pub fn finish(text: &str, protected: &Protected) -> String {
    let text = paragraph_boundaries(text);
    let text = line_breaks(&text);
    let text = format!("<p>{text}</p>");
    let text = strip_block_wrappers(&text);
    let text = drop_empty_paragraphs(&text);
    protected.restore(&text)
}

/// A whitespace run containing at least two newlines, starting at a
/// newline, becomes one paragraph boundary. The boundary consumes through
/// the run's last newline; trailing spaces on the next line survive.
fn paragraph_boundaries(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 16);
    let mut pos = 0;

    while let Some(rel) = memchr(b'\n', &bytes[pos..]) {
        let nl = pos + rel;
        let mut end = nl + 1;
        let mut last_nl = nl;
        while end < bytes.len() && bytes[end].is_ascii_whitespace() {
            if bytes[end] == b'\n' {
                last_nl = end;
            }
            end += 1;
        }
        out.push_str(&text[pos..nl]);
        if last_nl > nl {
            out.push_str("</p>\n<p>");
            pos = last_nl + 1;
        } else {
            out.push('\n');
            pos = nl + 1;
        }
    }

    out.push_str(&text[pos..]);
    out
}

/// Remaining single newlines become `<br />` unless followed by a
/// block-level construct, or standing at the very end of the text.
fn line_breaks(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 16);
    let mut pos = 0;

    while let Some(rel) = memchr(b'\n', &bytes[pos..]) {
        let nl = pos + rel;
        out.push_str(&text[pos..nl]);
        let rest = &text[nl + 1..];
        if rest.is_empty() || at_block_boundary(rest) {
            out.push('\n');
        } else {
            out.push_str("<br />");
        }
        pos = nl + 1;
    }

    out.push_str(&text[pos..]);
    out
}

/// Block-level constructs that may follow a newline without forcing a
/// visual line break: opening or closing tags of headings, lists, list
/// items, preformatted blocks, rules, paragraphs, and the fenced-code
/// placeholder, which stands for a preformatted block at this stage.
fn at_block_boundary(rest: &str) -> bool {
    if rest.starts_with(BLOCK_TOKEN_PREFIX) {
        return true;
    }
    let Some(tag) = rest.strip_prefix('<') else {
        return false;
    };
    let tag = tag.strip_prefix('/').unwrap_or(tag);
    const NAMES: [&str; 12] = [
        "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "pre", "hr", "p",
    ];
    NAMES.iter().any(|name| tag.starts_with(name))
}

/// Strip paragraph tags wrapping elements that are already block-level:
/// single-line headings, complete lists, rules, preformatted blocks, and
/// paragraphs holding exactly one fenced-code placeholder.
fn strip_block_wrappers(text: &str) -> String {
    let mut out = strip_wrapped(text, "<h1>", "</h1>", true);
    out = strip_wrapped(&out, "<h2>", "</h2>", true);
    out = strip_wrapped(&out, "<h3>", "</h3>", true);
    out = strip_list_wrappers(&out);
    out = out.replace("<p><hr /></p>", "<hr />");
    out = strip_wrapped(&out, "<pre><code>", "</code></pre>", false);
    strip_placeholder_wrappers(&out)
}

/// Strip `<p>`/`</p>` around a region delimited by `open` and `close`.
/// With `single_line`, the region must not contain a newline.
fn strip_wrapped(text: &str, open: &str, close: &str, single_line: bool) -> String {
    let p_open = format!("<p>{open}");
    let p_close = format!("{close}</p>");
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(rel) = text[pos..].find(&p_open) {
        let start = pos + rel;
        let body_start = start + 3;
        let search_from = start + p_open.len();
        let matched = text[search_from..].find(&p_close).and_then(|crel| {
            let body_end = search_from + crel + close.len();
            let body = &text[body_start..body_end];
            (!single_line || !body.contains('\n')).then_some(body_end)
        });
        match matched {
            Some(body_end) => {
                out.push_str(&text[pos..start]);
                out.push_str(&text[body_start..body_end]);
                pos = body_end + 4;
            }
            None => {
                out.push_str(&text[pos..start + p_open.len()]);
                pos = start + p_open.len();
            }
        }
    }

    out.push_str(&text[pos..]);
    out
}

/// Lists carry attributes (`<ol start="N">`), so their wrapper strip
/// matches on the tag prefix and the earliest close-tag-then-`</p>` pair.
fn strip_list_wrappers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(rel) = text[pos..].find("<p>") {
        let start = pos + rel;
        let body = &text[start + 3..];
        let body_end = if body.starts_with("<ul>") || body.starts_with("<ol") {
            ["</ul></p>", "</ol></p>"]
                .iter()
                .filter_map(|pat| body.find(pat))
                .min()
                .map(|i| i + 5)
        } else {
            None
        };
        match body_end {
            Some(body_end) => {
                out.push_str(&text[pos..start]);
                out.push_str(&body[..body_end]);
                pos = start + 3 + body_end + 4;
            }
            None => {
                out.push_str(&text[pos..start + 3]);
                pos = start + 3;
            }
        }
    }

    out.push_str(&text[pos..]);
    out
}

/// A paragraph whose trimmed body is exactly one fenced-code placeholder
/// loses its wrapper; restoration then leaves the block element bare.
fn strip_placeholder_wrappers(text: &str) -> String {
    rewrite_paragraphs(text, |inner, out| {
        if is_block_token(inner.trim()) {
            out.push_str(inner);
        } else {
            out.push_str("<p>");
            out.push_str(inner);
            out.push_str("</p>");
        }
    })
}

/// Remove paragraphs that are empty, whitespace-only, or hold nothing but
/// line breaks and whitespace.
fn drop_empty_paragraphs(text: &str) -> String {
    rewrite_paragraphs(text, |inner, out| {
        if !paragraph_is_empty(inner) {
            out.push_str("<p>");
            out.push_str(inner);
            out.push_str("</p>");
        }
    })
}

/// Apply `rewrite` to every `<p>…</p>` region. Paragraphs never nest by
/// construction, so a flat scan for the next close tag is enough.
fn rewrite_paragraphs(text: &str, rewrite: impl Fn(&str, &mut String)) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(rel) = text[pos..].find("<p>") {
        let start = pos + rel;
        let inner_start = start + 3;
        let Some(crel) = text[inner_start..].find("</p>") else {
            break;
        };
        let inner_end = inner_start + crel;
        out.push_str(&text[pos..start]);
        rewrite(&text[inner_start..inner_end], &mut out);
        pos = inner_end + 4;
    }

    out.push_str(&text[pos..]);
    out
}

fn paragraph_is_empty(inner: &str) -> bool {
    let mut rest = inner.trim_start();
    while let Some(after) = rest.strip_prefix("<br />") {
        rest = after.trim_start();
    }
    rest.is_empty()
}

fn is_block_token(s: &str) -> bool {
    s.strip_prefix(BLOCK_TOKEN_PREFIX)
        .and_then(|rest| rest.strip_suffix("__"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
