//! Source context extraction for caret diagnostics.
//!
//! All measurements here are in characters, never bytes: a window never
//! splits a UTF-8 sequence, and the pointer is padded to the visual width of
//! the text in front of the failure (tabs expanded to tab stops).

use unicode_width::UnicodeWidthChar;

/// Marker printed under the failure position.
pub const POINTER_MARKER: &str = "^~~~";

/// Characters of context taken on each side of the failure.
pub const DEFAULT_CONTEXT_SPAN: usize = 60;

pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Returns the text around `offset` on its line: up to `span` characters
/// before and up to `span` characters after, each clipped at a line break.
///
/// An offset past the end is clamped to the end; an offset inside a
/// multi-byte character is moved back to the start of that character.
pub fn context_window(text: &str, offset: usize, span: usize) -> (&str, &str) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let head = &text[..offset];
    let start = head
        .char_indices()
        .rev()
        .take(span)
        .last()
        .map_or(offset, |(i, _)| i);
    let before = &head[start..];
    let before = before.rfind('\n').map_or(before, |i| &before[i + 1..]);

    let tail = &text[offset..];
    let end = tail
        .char_indices()
        .nth(span)
        .map_or(tail.len(), |(i, _)| i);
    let after = &tail[..end];
    let after = match after.find('\n') {
        Some(i) => {
            let line = &after[..i];
            line.strip_suffix('\r').unwrap_or(line)
        }
        None => after,
    };

    (before, after)
}

/// Display width of `text` with tabs expanded to multiples of `tab_width`.
///
/// Widths are terminal cells, not characters: a wide CJK character counts
/// two, a combining mark counts zero.
pub fn visual_width(text: &str, tab_width: usize) -> usize {
    text.chars().fold(0, |column, ch| match ch {
        '\t' if tab_width == 0 => column,
        '\t' => column + tab_width - column % tab_width,
        _ => column + ch.width().unwrap_or(0),
    })
}

/// Spaces up to the visual end of `before`, then the marker.
pub fn pointer(before: &str, tab_width: usize) -> String {
    format!("{}{}", " ".repeat(visual_width(before, tab_width)), POINTER_MARKER)
}
