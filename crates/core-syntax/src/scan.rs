//! Two-state per-line tokenizer.
//!
//! `parse_line` is a pure function: the only context a line needs from
//! its predecessors is whether they left a `/* ... */` comment open,
//! carried in [`ScanState`]. Re-tokenizing any window of lines therefore
//! needs nothing but the state at its top, which
//! [`scan_state_after`] derives by folding over the preceding lines.
//!
//! Tokens are byte ranges into the scanned line. Adjacent ranges of the
//! same class are merged, so a consumer can treat the token list as a
//! span cover of the line.

use crate::{HighlightClass, Syntax};

/// Scanner state carried across line boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    NormalCode,
    InBlockComment,
}

/// One highlighted span, a half-open byte range of the scanned line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub class: HighlightClass,
}

impl Token {
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }
}

fn push(tokens: &mut Vec<Token>, start: usize, end: usize, class: HighlightClass) {
    if end <= start {
        return;
    }
    if let Some(last) = tokens.last_mut() {
        if last.class == class && last.end == start {
            last.end = end;
            return;
        }
    }
    tokens.push(Token { start, end, class });
}

/// Tokenize one line, returning the spans and the state the next line
/// starts in.
pub fn parse_line(syntax: &Syntax, state: ScanState, line: &str) -> (Vec<Token>, ScanState) {
    let mut tokens = Vec::new();
    if line.is_empty() {
        return (tokens, state);
    }
    let bytes = line.as_bytes();
    let mut i = 0;

    // Resume a comment left open by a previous line.
    if state == ScanState::InBlockComment {
        match line.find("*/") {
            Some(close) => {
                push(&mut tokens, 0, close + 2, HighlightClass::Comment);
                i = close + 2;
            }
            None => {
                push(&mut tokens, 0, line.len(), HighlightClass::Comment);
                return (tokens, ScanState::InBlockComment);
            }
        }
    } else if let Some(tokens) = preprocessor_line(line) {
        return (tokens, ScanState::NormalCode);
    }

    while i < line.len() {
        if bytes[i..].starts_with(b"//") {
            push(&mut tokens, i, line.len(), HighlightClass::Comment);
            break;
        }
        if bytes[i..].starts_with(b"/*") {
            match line[i + 2..].find("*/") {
                Some(rel) => {
                    let close = i + 2 + rel + 2;
                    push(&mut tokens, i, close, HighlightClass::Comment);
                    i = close;
                }
                None => {
                    push(&mut tokens, i, line.len(), HighlightClass::Comment);
                    return (tokens, ScanState::InBlockComment);
                }
            }
            continue;
        }
        let b = bytes[i];
        if b == b'"' || b == b'\'' {
            let end = string_end(bytes, i);
            push(&mut tokens, i, end, HighlightClass::String);
            i = end;
            continue;
        }
        if b.is_ascii_digit() || (b == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            let end = number_end(bytes, i);
            push(&mut tokens, i, end, HighlightClass::Number);
            i = end;
            continue;
        }
        if is_word_start(b, syntax, bytes.get(i + 1).copied()) {
            let mut end = i + 1;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            push(&mut tokens, i, end, syntax.class_of(&line[i..end]));
            i = end;
            continue;
        }
        // Anything else, including non-ASCII text, is plain.
        let width = line[i..].chars().next().map(char::len_utf8).unwrap_or(1);
        push(&mut tokens, i, i + width, HighlightClass::Default);
        i += width;
    }
    (tokens, ScanState::NormalCode)
}

fn is_word_start(b: u8, syntax: &Syntax, next: Option<u8>) -> bool {
    if b.is_ascii_alphabetic() || b == b'_' {
        return true;
    }
    // Assembler directives (.text) and, with the sigil, registers (%rax).
    if b == b'.' && next.is_some_and(|n| n.is_ascii_alphabetic()) {
        return true;
    }
    if b == b'%' && syntax.register_sigil() && next.is_some_and(|n| n.is_ascii_alphanumeric()) {
        return true;
    }
    false
}

/// `# ...` directive lines, handled whole. `#include` gets its header
/// argument coloured as a string, `<stdio.h>` and `"local.h"` alike.
fn preprocessor_line(line: &str) -> Option<Vec<Token>> {
    let first = line.find(|c: char| c != ' ' && c != '\t')?;
    if line.as_bytes()[first] != b'#' {
        return None;
    }
    let mut tokens = Vec::new();
    push(&mut tokens, 0, first, HighlightClass::Default);
    let directive_end = line[first..]
        .find(|c: char| c.is_whitespace())
        .map(|rel| first + rel)
        .unwrap_or(line.len());
    push(&mut tokens, first, directive_end, HighlightClass::Preprocessor);
    let mut i = directive_end;

    if &line[first..directive_end] == "#include" {
        if let Some(rel) = line[i..].find(['<', '"']) {
            let header_start = i + rel;
            push(&mut tokens, i, header_start, HighlightClass::Default);
            let close = line[header_start + 1..]
                .find(['>', '"'])
                .map(|r| header_start + 1 + r + 1);
            if let Some(end) = close {
                push(&mut tokens, header_start, end, HighlightClass::String);
                i = end;
            } else {
                i = header_start;
            }
        }
    }
    push(&mut tokens, i, line.len(), HighlightClass::Default);
    Some(tokens)
}

fn string_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() && !(bytes[i] == quote && bytes[i - 1] != b'\\') {
        i += 1;
    }
    if i < bytes.len() { i + 1 } else { i }
}

fn number_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    if bytes[i] == b'0' && matches!(bytes.get(i + 1), Some(b'x' | b'X')) {
        i += 2;
        while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
            i += 1;
        }
    } else if bytes[i] == b'0' && matches!(bytes.get(i + 1), Some(b'b' | b'B')) {
        i += 2;
        while i < bytes.len() && matches!(bytes[i], b'0' | b'1') {
            i += 1;
        }
    } else {
        while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
            i += 1;
        }
    }
    while i < bytes.len() && matches!(bytes[i].to_ascii_lowercase(), b'u' | b'l' | b'f') {
        i += 1;
    }
    i
}

/// State at the start of the line *after* folding the scanner over
/// `lines`. Feed it the lines above a viewport to tokenize the visible
/// window in isolation.
pub fn scan_state_after<'a>(syntax: &Syntax, lines: impl Iterator<Item = &'a str>) -> ScanState {
    lines.fold(ScanState::default(), |state, line| {
        parse_line(syntax, state, line).1
    })
}
