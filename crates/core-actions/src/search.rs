//! Wrapping, ASCII-case-insensitive search and replace.
//!
//! Matching lowercases both the needle and each line with
//! `to_ascii_lowercase`, which never changes byte offsets, so match
//! positions found in the lowered copy are valid in the original text.
//! A search scans forward from the cursor, wraps past the last line, and
//! gives up after visiting every line once. A hit selects the matched
//! span and parks the cursor just past it, so repeating the search walks
//! from match to match.

use tracing::{debug, trace};

use core_document::cols;
use core_state::{EditorBuffer, TextArea};

/// Incremental search fires once the term reaches this length.
const INCREMENTAL_MIN_CHARS: usize = 3;

/// Find the next occurrence of `term` and select it. `next` starts the
/// scan at the cursor (so a fresh search can match at the cursor itself);
/// without it the current line is scanned from column 1.
///
/// Returns false, with any previous match deselected, when the term is
/// empty or absent from the buffer.
pub fn perform_search(buf: &mut EditorBuffer, term: &str, next: bool, area: &TextArea) -> bool {
    if term.is_empty() {
        return false;
    }
    let needle = term.to_ascii_lowercase();
    let start_col = if next { buf.cursor_col } else { 1 };
    let total = buf.document.total_lines();

    let mut id = buf.current_line;
    let mut line_num = buf.current_line_num;
    for visited in 0..=total {
        let text = buf.document.text(id);
        let from = if visited == 0 {
            cols::byte_of_col(text, start_col)
        } else {
            0
        };
        if let Some(offset) = text.to_ascii_lowercase()[from..].find(&needle) {
            let match_col = cols::col_of_byte(text, from + offset);
            buf.clear_selection();
            buf.current_line = id;
            buf.current_line_num = line_num;
            buf.cursor_col = match_col;
            buf.begin_selection_if_needed();
            buf.cursor_col = match_col + needle.chars().count();
            buf.update_selection();
            buf.update_scroll(area);
            trace!(target: "actions.search", line = line_num, col = match_col, "hit");
            return true;
        }
        match buf.document.next(id) {
            Some(n) => {
                id = n;
                line_num += 1;
            }
            None => {
                id = buf.document.head();
                line_num = 1;
            }
        }
    }
    buf.clear_selection();
    trace!(target: "actions.search", term = %term, "miss");
    false
}

/// Replace the currently selected match with `replacement`, then search
/// for the next occurrence. When the selection is not a match of `term`
/// (or nothing is selected) this degrades to a plain search.
pub fn perform_replace(
    buf: &mut EditorBuffer,
    term: &str,
    replacement: &str,
    area: &TextArea,
) -> bool {
    if term.is_empty() {
        return false;
    }

    let is_current_match = match buf.normalized_range() {
        Some(r) if r.start_line == r.end_line => buf
            .selected_text()
            .is_some_and(|sel| sel.eq_ignore_ascii_case(term)),
        _ => false,
    };

    if is_current_match {
        buf.create_undo_point();
        buf.delete_selected_range(area);
        let col = buf.cursor_col;
        let line = buf.document.line_mut(buf.current_line);
        cols::insert_at_col(&mut line.text, col, replacement);
        buf.cursor_col = col + cols::col_len(replacement);
        buf.changed = true;
        debug!(target: "actions.search", line = buf.current_line_num, "replaced");
    }
    perform_search(buf, term, true, area)
}

/// Replace every occurrence of `term` in the buffer. One undo step for
/// the whole sweep; the cursor stays where it was. Scanning resumes
/// strictly after each inserted replacement, so a replacement that
/// contains the term is not rescanned.
pub fn replace_all(
    buf: &mut EditorBuffer,
    term: &str,
    replacement: &str,
    area: &TextArea,
) -> usize {
    if term.is_empty() {
        return 0;
    }
    let needle = term.to_ascii_lowercase();

    let any = buf
        .document
        .iter()
        .any(|id| buf.document.text(id).to_ascii_lowercase().contains(&needle));
    if !any {
        return 0;
    }

    buf.create_undo_point();
    buf.clear_selection();
    let mut count = 0;
    let ids: Vec<_> = buf.document.iter().collect();
    for id in ids {
        let line = buf.document.line_mut(id);
        let mut from = 0;
        while let Some(offset) = line.text.to_ascii_lowercase()[from..].find(&needle) {
            let at = from + offset;
            line.text.replace_range(at..at + needle.len(), replacement);
            from = at + replacement.len();
            count += 1;
        }
    }
    buf.clamp_cursor_col();
    buf.changed = true;
    buf.update_scroll(area);
    debug!(target: "actions.search", count, "replace_all");
    count
}

/// Cursor and viewport position captured when a search prompt opens.
#[derive(Debug, Clone, Copy)]
struct ViewOrigin {
    line_num: usize,
    col: usize,
    first_visible_line_num: usize,
}

/// One interactive search/replace prompt session.
///
/// The session owns the term and replacement strings while they are being
/// typed, re-runs the search incrementally once the term is long enough,
/// and can put the view back where it was if the prompt is cancelled.
#[derive(Debug)]
pub struct SearchSession {
    pub term: String,
    pub replacement: String,
    origin: ViewOrigin,
}

impl SearchSession {
    /// Open a session, remembering where the cursor and viewport are.
    pub fn begin(buf: &EditorBuffer) -> Self {
        Self {
            term: String::new(),
            replacement: String::new(),
            origin: ViewOrigin {
                line_num: buf.current_line_num,
                col: buf.cursor_col,
                first_visible_line_num: buf.first_visible_line_num(),
            },
        }
    }

    /// Append to the term; once it reaches three characters each keystroke
    /// re-searches from the original cursor position.
    pub fn push_term_char(&mut self, buf: &mut EditorBuffer, area: &TextArea, c: char) {
        self.term.push(c);
        self.incremental(buf, area);
    }

    /// Remove the last term character, re-searching or restoring the view
    /// depending on the remaining length.
    pub fn pop_term_char(&mut self, buf: &mut EditorBuffer, area: &TextArea) {
        self.term.pop();
        if self.term.chars().count() >= INCREMENTAL_MIN_CHARS {
            self.incremental(buf, area);
        } else {
            self.restore_origin(buf, area);
        }
    }

    pub fn push_replacement_char(&mut self, c: char) {
        self.replacement.push(c);
    }

    pub fn pop_replacement_char(&mut self) {
        self.replacement.pop();
    }

    /// Abandon the prompt and put the view back where it started.
    pub fn cancel(self, buf: &mut EditorBuffer, area: &TextArea) {
        self.restore_origin(buf, area);
    }

    fn incremental(&self, buf: &mut EditorBuffer, area: &TextArea) {
        if self.term.chars().count() < INCREMENTAL_MIN_CHARS {
            return;
        }
        // Anchor each incremental attempt at the prompt's origin so a
        // shrinking term does not drift forward through earlier matches.
        self.move_to_origin(buf);
        perform_search(buf, &self.term, false, area);
    }

    fn move_to_origin(&self, buf: &mut EditorBuffer) {
        buf.clear_selection();
        buf.go_to_line(self.origin.line_num);
        buf.cursor_col = self.origin.col;
        buf.clamp_cursor_col();
    }

    fn restore_origin(&self, buf: &mut EditorBuffer, area: &TextArea) {
        self.move_to_origin(buf);
        buf.first_visible = buf
            .document
            .line_id_at(self.origin.first_visible_line_num);
        buf.update_scroll(area);
    }
}
