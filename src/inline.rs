//! Line-level and inline transforms over the protected text.
//!
//! Order is fixed: rules, bold, italic, headings, links. Bold runs before
//! italic so a double-asterisk run is never read as two single-asterisk
//! matches. Everything scans bytes with `memchr` and bulk-copies the
//! segments between matches; unmatched delimiters stay literal.

use memchr::memchr;
use memchr::memmem;

use crate::render::HtmlWriter;

/// Apply every line-level transform, in order.
pub fn transform(text: &str) -> String {
    let text = rules(text);
    let text = bold(&text);
    let text = italic(&text);
    let text = headings(&text);
    links(&text)
}

/// A line consisting of exactly three hyphens becomes a rule.
fn rules(text: &str) -> String {
    let mut out = HtmlWriter::with_capacity_for(text.len());
    for line in text.split('\n') {
        if line == "---" {
            out.thematic_break();
        } else {
            out.write_string(line);
        }
        out.newline();
    }
    out.trim_trailing_newline();
    out.into_string()
}

/// Double-asterisk spans become strong elements.
fn bold(text: &str) -> String {
    let bytes = text.as_bytes();
    let finder = memmem::Finder::new(b"**");
    let mut out = HtmlWriter::with_capacity_for(text.len());
    let mut pos = 0;

    while let Some(rel) = finder.find(&bytes[pos..]) {
        let open = pos + rel;
        match find_bold_close(bytes, open + 2) {
            Some(close) => {
                out.write_string(&text[pos..open]);
                out.strong_open();
                out.write_string(&text[open + 2..close]);
                out.strong_close();
                pos = close + 2;
            }
            None => {
                out.write_string(&text[pos..open + 2]);
                pos = open + 2;
            }
        }
    }

    out.write_string(&text[pos..]);
    out.into_string()
}

/// Closer for a bold span: the next `**` on the same line whose following
/// byte is not a third asterisk. Skipping glued closers makes a run like
/// `***x***` resolve as one outer bold pair, leaving the inner single
/// asterisks for the italic pass.
fn find_bold_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < bytes.len() {
        match bytes[i] {
            b'\n' => return None,
            b'*' if bytes[i + 1] == b'*' && bytes.get(i + 2) != Some(&b'*') => {
                return Some(i);
            }
            _ => i += 1,
        }
    }
    None
}

/// Single-asterisk spans become emphasis elements.
///
/// The opening asterisk must not be glued to another asterisk on its left,
/// the closing one must not be glued on its right, and the content is one
/// or more characters containing neither an asterisk nor a newline.
fn italic(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = HtmlWriter::with_capacity_for(text.len());
    let mut pos = 0;
    let mut scan = 0;

    while let Some(rel) = memchr(b'*', &bytes[scan..]) {
        let open = scan + rel;
        if open > 0 && bytes[open - 1] == b'*' {
            scan = open + 1;
            continue;
        }
        match find_italic_close(bytes, open + 1) {
            Some(close) => {
                out.write_string(&text[pos..open]);
                out.em_open();
                out.write_string(&text[open + 1..close]);
                out.em_close();
                pos = close + 1;
                scan = pos;
            }
            None => scan = open + 1,
        }
    }

    out.write_string(&text[pos..]);
    out.into_string()
}

/// Closer for an emphasis span, or None when the span cannot match here.
fn find_italic_close(bytes: &[u8], from: usize) -> Option<usize> {
    let rel = memchr(b'*', &bytes[from..])?;
    let close = from + rel;
    if close == from {
        return None; // empty content
    }
    if memchr(b'\n', &bytes[from..close]).is_some() {
        return None; // emphasis never crosses a line
    }
    if bytes.get(close + 1) == Some(&b'*') {
        return None;
    }
    Some(close)
}

/// One to three leading hashes, space-separated from the text, consume the
/// whole line as a heading. Deeper hashes and missing spaces stay literal.
fn headings(text: &str) -> String {
    let mut out = HtmlWriter::with_capacity_for(text.len());
    for line in text.split('\n') {
        match heading_level(line) {
            Some((level, rest)) => {
                out.heading_open(level);
                out.write_string(rest);
                out.heading_close(level);
            }
            None => out.write_string(line),
        }
        out.newline();
    }
    out.trim_trailing_newline();
    out.into_string()
}

fn heading_level(line: &str) -> Option<(u8, &str)> {
    if let Some(rest) = line.strip_prefix("### ") {
        return Some((3, rest));
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Some((2, rest));
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Some((1, rest));
    }
    None
}

/// `[text](url)` becomes an anchor. The text runs to the first `]`, the
/// url to the first `)`; both may be empty.
fn links(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = HtmlWriter::with_capacity_for(text.len());
    let mut pos = 0;
    let mut scan = 0;

    while let Some(rel) = memchr(b'[', &bytes[scan..]) {
        let open = scan + rel;
        let Some(link) = match_link(bytes, open) else {
            scan = open + 1;
            continue;
        };
        out.write_string(&text[pos..open]);
        out.link_open(&text[link.url_start..link.url_end]);
        out.write_string(&text[open + 1..link.text_end]);
        out.link_close();
        pos = link.end;
        scan = pos;
    }

    out.write_string(&text[pos..]);
    out.into_string()
}

struct LinkMatch {
    text_end: usize,
    url_start: usize,
    url_end: usize,
    end: usize,
}

fn match_link(bytes: &[u8], open: usize) -> Option<LinkMatch> {
    let text_end = open + 1 + memchr(b']', &bytes[open + 1..])?;
    if bytes.get(text_end + 1) != Some(&b'(') {
        return None;
    }
    let url_start = text_end + 2;
    let url_end = url_start + memchr(b')', &bytes[url_start..])?;
    Some(LinkMatch {
        text_end,
        url_start,
        url_end,
        end: url_end + 1,
    })
}
