//! 1-based character-column helpers.
//!
//! The editor addresses positions as (line number, column) with columns
//! counted in characters starting at 1. Column `len + 1` is the insert
//! position after the last character. These helpers translate between
//! columns and byte offsets so `String` edits always land on character
//! boundaries.

/// Number of character columns in `text` (the valid cursor range is
/// `1..=col_len(text) + 1`).
pub fn col_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the 1-based column `col`, clamped to `text.len()`.
pub fn byte_of_col(text: &str, col: usize) -> usize {
    if col <= 1 {
        return 0;
    }
    text.char_indices()
        .nth(col - 1)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// 1-based column of the character starting at byte offset `byte`.
pub fn col_of_byte(text: &str, byte: usize) -> usize {
    text[..byte.min(text.len())].chars().count() + 1
}

/// Substring covering the half-open column range `[start, end)`.
pub fn slice_cols(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    &text[byte_of_col(text, start)..byte_of_col(text, end)]
}

/// Insert `s` before column `col`.
pub fn insert_at_col(text: &mut String, col: usize, s: &str) {
    let at = byte_of_col(text, col);
    text.insert_str(at, s);
}

/// Remove the half-open column range `[start, end)`.
pub fn remove_cols(text: &mut String, start: usize, end: usize) {
    if end <= start {
        return;
    }
    let from = byte_of_col(text, start);
    let to = byte_of_col(text, end);
    text.replace_range(from..to, "");
}

/// Truncate `text` so that column `col` becomes one past the end,
/// returning the removed tail.
pub fn split_off_at_col(text: &mut String, col: usize) -> String {
    text.split_off(byte_of_col(text, col))
}

/// Column of the first non-blank character, or `None` for all-blank lines.
pub fn first_non_blank_col(text: &str) -> Option<usize> {
    text.chars()
        .position(|c| c != ' ' && c != '\t')
        .map(|i| i + 1)
}

/// Leading whitespace prefix (spaces and tabs).
pub fn leading_whitespace(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(b, _)| b)
        .unwrap_or(text.len());
    &text[..end]
}
