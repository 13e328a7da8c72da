//! Protected-span extraction.
//!
//! Fenced code blocks and inline code spans are lifted out of the text
//! before any other transform runs, leaving numbered placeholder tokens
//! behind. Fences are processed strictly before spans so a backtick inside
//! a fence is never read as a span delimiter. The recorded fragments are
//! wrapped, never escaped; escaping untrusted input is the caller's
//! concern.

use memchr::memchr;
use memchr::memmem;

use crate::render::HtmlWriter;

/// Placeholder prefix for fenced code blocks.
pub const BLOCK_TOKEN_PREFIX: &str = "__CODE_BLOCK_";

/// Placeholder prefix for inline code spans.
pub const SPAN_TOKEN_PREFIX: &str = "__CODE_SPAN_";

const TOKEN_SUFFIX: &str = "__";

/// Placeholder token for the fenced code block at `index`.
#[inline]
pub(crate) fn block_token(index: usize) -> String {
    format!("{BLOCK_TOKEN_PREFIX}{index}{TOKEN_SUFFIX}")
}

/// Placeholder token for the inline code span at `index`.
#[inline]
pub(crate) fn span_token(index: usize) -> String {
    format!("{SPAN_TOKEN_PREFIX}{index}{TOKEN_SUFFIX}")
}

/// Table of protected HTML fragments for one render call.
///
/// Indices are assigned in first-seen order and never reused within a
/// call; restoration uses the exact same indices, blocks before spans.
#[derive(Debug, Default)]
pub struct Protected {
    blocks: Vec<String>,
    spans: Vec<String>,
}

impl Protected {
    /// Number of recorded fenced code blocks.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of recorded inline code spans.
    #[inline]
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    fn push_block(&mut self, html: String) -> usize {
        self.blocks.push(html);
        self.blocks.len() - 1
    }

    fn push_span(&mut self, html: String) -> usize {
        self.spans.push(html);
        self.spans.len() - 1
    }

    /// Substitute every recorded fragment back into `text`.
    ///
    /// Block tokens are restored before span tokens: a span's literal
    /// content may look like a block token, and restoring blocks while
    /// that content is still hidden keeps the substitution unambiguous.
    /// Each token is replaced exactly once, at its first occurrence.
    pub fn restore(&self, text: &str) -> String {
        let mut out = text.to_owned();
        for (index, html) in self.blocks.iter().enumerate() {
            out = out.replacen(&block_token(index), html, 1);
        }
        for (index, html) in self.spans.iter().enumerate() {
            out = out.replacen(&span_token(index), html, 1);
        }
        out
    }
}

/// Extract fenced code blocks, then inline code spans, returning the
/// protected text and the table of recorded fragments.
pub fn extract(input: &str) -> (String, Protected) {
    let mut table = Protected::default();
    let blocked = extract_blocks(input, &mut table);
    let protected = extract_spans(&blocked, &mut table);
    (protected, table)
}

/// Replace each fenced code block with a block token on its own line.
///
/// A fence opens only at the start of a line; the block runs to the next
/// fence marker, or to end of input when unterminated. Content is trimmed
/// of surrounding whitespace.
fn extract_blocks(input: &str, table: &mut Protected) -> String {
    let bytes = input.as_bytes();
    let finder = memmem::Finder::new(b"```");
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(rel) = finder.find(&bytes[pos..]) {
        let open = pos + rel;
        if open > 0 && bytes[open - 1] != b'\n' {
            // Not line-initial: literal backticks, keep scanning.
            out.push_str(&input[pos..open + 3]);
            pos = open + 3;
            continue;
        }

        let content_start = open + 3;
        let (content_end, resume) = match finder.find(&bytes[content_start..]) {
            Some(rel) => (content_start + rel, content_start + rel + 3),
            None => (input.len(), input.len()),
        };

        out.push_str(&input[pos..open]);
        let content = input[content_start..content_end].trim();
        let mut html = HtmlWriter::with_capacity_for(content.len());
        html.code_block(content);
        let index = table.push_block(html.into_string());
        out.push('\n');
        out.push_str(&block_token(index));
        out.push('\n');
        pos = resume;
    }

    out.push_str(&input[pos..]);
    out
}

/// Replace each single-backtick span with a span token.
///
/// Span content may be empty and may cross newlines; an unterminated
/// backtick stays literal. A span never swallows a block token: a stray
/// backtick before a fence and another after it would otherwise hide the
/// token inside the span's recorded fragment, where restoration cannot
/// reach it.
fn extract_spans(input: &str, table: &mut Protected) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(rel) = memchr(b'`', &bytes[pos..]) {
        let open = pos + rel;
        let Some(close_rel) = memchr(b'`', &bytes[open + 1..]) else {
            break;
        };
        let close = open + 1 + close_rel;

        let content = &input[open + 1..close];
        if content.contains(BLOCK_TOKEN_PREFIX) {
            out.push_str(&input[pos..open + 1]);
            pos = open + 1;
            continue;
        }

        out.push_str(&input[pos..open]);
        let mut html = HtmlWriter::with_capacity_for(content.len());
        html.code_span(content);
        let index = table.push_span(html.into_string());
        out.push_str(&span_token(index));
        pos = close + 1;
    }

    out.push_str(&input[pos..]);
    out
}
