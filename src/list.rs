//! List-structure transform.
//!
//! A line-by-line pass over the stage-2 output driving an explicit stack
//! of open list frames. The stack holds at most one frame per indentation
//! level, levels strictly increasing toward the top, and every transition
//! keeps open and close tags balanced: the stack is empty on entry and
//! fully drained by end of input.

use smallvec::SmallVec;

use crate::protect::BLOCK_TOKEN_PREFIX;
use crate::render::HtmlWriter;

/// Ordered-list markers wider than this degrade to plain text.
const MAX_MARKER_DIGITS: usize = 9;

/// Kind of an open list frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bulleted list (`*` or `-` markers).
    Unordered,
    /// Numbered list; `start` is the literal first marker value.
    Ordered { start: u32 },
}

impl ListKind {
    /// Frames continue across items of the same kind; the start value only
    /// matters when a new ordered frame is opened.
    #[inline]
    fn matches(self, other: ListKind) -> bool {
        matches!(
            (self, other),
            (ListKind::Unordered, ListKind::Unordered)
                | (ListKind::Ordered { .. }, ListKind::Ordered { .. })
        )
    }
}

/// One open list element.
#[derive(Debug, Clone, Copy)]
struct ListFrame {
    kind: ListKind,
    level: usize,
}

enum LineClass<'a> {
    /// A fenced-code placeholder on its own line.
    BlockToken,
    /// A bulleted or numbered item with its marker stripped.
    Item { kind: ListKind, text: &'a str },
    Blank,
    Text,
}

/// Rewrite list items into balanced list markup, leaving every other line
/// unchanged. Item text was already transformed by the inline pass and is
/// not re-processed here.
pub fn transform(text: &str) -> String {
    let mut out = HtmlWriter::with_capacity_for(text.len());
    let mut stack: SmallVec<[ListFrame; 8]> = SmallVec::new();

    for line in text.split('\n') {
        match classify(line.trim()) {
            LineClass::BlockToken => {
                // A fenced block at the top level is never nested inside
                // a list.
                close_all(&mut out, &mut stack);
                write_line(&mut out, line);
            }
            LineClass::Blank => {
                // Blank lines may separate sibling items without breaking
                // the list.
                write_line(&mut out, line);
            }
            LineClass::Text => {
                close_all(&mut out, &mut stack);
                write_line(&mut out, line);
            }
            LineClass::Item { kind, text: item } => {
                let level = indent_level(line);
                close_to(&mut out, &mut stack, level, kind);

                let needs_open = stack.last().is_none_or(|top| top.level < level);
                if needs_open {
                    match kind {
                        ListKind::Unordered => out.ul_open(),
                        ListKind::Ordered { start } => out.ol_open(start),
                    }
                    out.newline();
                    stack.push(ListFrame { kind, level });
                }

                out.li_open();
                out.write_string(item);
                out.li_close();
                out.newline();
            }
        }
    }

    close_all(&mut out, &mut stack);
    out.trim_trailing_newline();
    out.into_string()
}

#[inline]
fn write_line(out: &mut HtmlWriter, line: &str) {
    out.write_string(line);
    out.newline();
}

/// Pop frames that cannot contain the incoming item: anything strictly
/// deeper, plus a same-level frame of the other kind. A strictly
/// shallower ancestor is never closed.
fn close_to(out: &mut HtmlWriter, stack: &mut SmallVec<[ListFrame; 8]>, level: usize, kind: ListKind) {
    while let Some(top) = stack.last().copied() {
        if top.level > level || (top.level == level && !top.kind.matches(kind)) {
            stack.pop();
            close_frame(out, top);
        } else {
            break;
        }
    }
}

fn close_all(out: &mut HtmlWriter, stack: &mut SmallVec<[ListFrame; 8]>) {
    while let Some(frame) = stack.pop() {
        close_frame(out, frame);
    }
}

fn close_frame(out: &mut HtmlWriter, frame: ListFrame) {
    match frame.kind {
        ListKind::Unordered => out.ul_close(),
        ListKind::Ordered { .. } => out.ol_close(),
    }
    out.newline();
}

/// Indentation level of the raw line: leading spaces and tabs, two per
/// level, rounded down (3 spaces is level 1).
fn indent_level(line: &str) -> usize {
    let leading = line
        .bytes()
        .take_while(|&b| b == b' ' || b == b'\t')
        .count();
    leading / 2
}

fn classify(trimmed: &str) -> LineClass<'_> {
    if trimmed.is_empty() {
        return LineClass::Blank;
    }
    if trimmed.starts_with(BLOCK_TOKEN_PREFIX) {
        return LineClass::BlockToken;
    }
    if let Some(text) = bullet_item(trimmed) {
        return LineClass::Item {
            kind: ListKind::Unordered,
            text,
        };
    }
    if let Some((start, text)) = numbered_item(trimmed) {
        return LineClass::Item {
            kind: ListKind::Ordered { start },
            text,
        };
    }
    LineClass::Text
}

/// `*` or `-`, at least one whitespace character, then the item text.
fn bullet_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('*').or_else(|| line.strip_prefix('-'))?;
    let text = rest.trim_start();
    if text.len() == rest.len() {
        return None;
    }
    Some(text)
}

/// Digits, a dot, at least one whitespace character, then the item text.
/// The digit run is the literal start value for a new ordered frame.
fn numbered_item(line: &str) -> Option<(u32, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > MAX_MARKER_DIGITS {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let text = rest.trim_start();
    if text.len() == rest.len() {
        return None;
    }
    let start = line[..digits].parse().ok()?;
    Some((start, text))
}
