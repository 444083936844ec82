//! Cursor motions over the line chain.
//!
//! Motions mutate only the logical cursor (line id, line number, column);
//! screen position and scrolling are re-derived afterwards by
//! [`EditorBuffer::update_scroll`]. Out-of-range motion is clamped, never
//! an error: moving left at column 1 of the first line, or down on the
//! last line, is a no-op.
//!
//! Word boundaries are whitespace/non-whitespace transitions; paragraph
//! boundaries are runs of blank lines, skipped as a unit.

use core_document::cols;

use crate::EditorBuffer;

impl EditorBuffer {
    pub fn move_up(&mut self) {
        if let Some(prev) = self.document.prev(self.current_line) {
            self.current_line = prev;
            self.current_line_num -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if let Some(next) = self.document.next(self.current_line) {
            self.current_line = next;
            self.current_line_num += 1;
        }
    }

    /// Left one column, wrapping to the end of the previous line.
    pub fn move_left(&mut self) {
        if self.cursor_col > 1 {
            self.cursor_col -= 1;
        } else if let Some(prev) = self.document.prev(self.current_line) {
            self.current_line = prev;
            self.current_line_num -= 1;
            self.cursor_col = cols::col_len(self.current_text()) + 1;
        }
    }

    /// Right one column, wrapping to the start of the next line.
    pub fn move_right(&mut self) {
        if self.cursor_col <= cols::col_len(self.current_text()) {
            self.cursor_col += 1;
        } else if let Some(next) = self.document.next(self.current_line) {
            self.current_line = next;
            self.current_line_num += 1;
            self.cursor_col = 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 1;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = cols::col_len(self.current_text()) + 1;
    }

    pub fn page_up(&mut self, page_height: usize) {
        for _ in 0..page_height {
            if self.document.prev(self.current_line).is_none() {
                break;
            }
            self.move_up();
        }
    }

    pub fn page_down(&mut self, page_height: usize) {
        for _ in 0..page_height {
            if self.document.next(self.current_line).is_none() {
                break;
            }
            self.move_down();
        }
    }

    /// Jump to the 1-based line `n`, clamped to the document.
    pub fn go_to_line(&mut self, n: usize) {
        let n = n.clamp(1, self.document.total_lines());
        self.current_line = self.document.line_id_at(n);
        self.current_line_num = n;
        self.clamp_cursor_col();
    }

    /// Forward to the start of the next word: skip the rest of the current
    /// word, then any whitespace. At end of line, moves to column 1 of the
    /// next line.
    pub fn go_to_next_word(&mut self) {
        let chars: Vec<char> = self.current_text().chars().collect();
        let mut pos = self.cursor_col - 1;

        if pos >= chars.len() {
            if let Some(next) = self.document.next(self.current_line) {
                self.current_line = next;
                self.current_line_num += 1;
                self.cursor_col = 1;
            }
            return;
        }
        while pos < chars.len() && !chars[pos].is_whitespace() {
            pos += 1;
        }
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        self.cursor_col = pos + 1;
    }

    /// Backward to the start of the previous word: skip whitespace, then
    /// the word itself. At column 1, moves to the end of the previous line.
    pub fn go_to_previous_word(&mut self) {
        if self.cursor_col < 2 {
            if let Some(prev) = self.document.prev(self.current_line) {
                self.current_line = prev;
                self.current_line_num -= 1;
                self.cursor_col = cols::col_len(self.current_text()) + 1;
            }
            return;
        }
        let chars: Vec<char> = self.current_text().chars().collect();
        let mut pos = self.cursor_col as isize - 2;
        while pos >= 0 && chars[pos as usize].is_whitespace() {
            pos -= 1;
        }
        while pos >= 0 && !chars[pos as usize].is_whitespace() {
            pos -= 1;
        }
        self.cursor_col = (pos + 2) as usize;
    }

    /// Down to the first non-blank line after the next blank-line run.
    pub fn go_to_next_paragraph(&mut self) {
        if self.document.next(self.current_line).is_none() {
            return;
        }
        let mut p = self.current_line;
        let mut seen_text = false;
        while let Some(next) = self.document.next(p) {
            if !self.document.text(p).is_empty() {
                seen_text = true;
            }
            if seen_text && self.document.text(p).is_empty() {
                break;
            }
            p = next;
            self.current_line_num += 1;
        }
        while let Some(next) = self.document.next(p) {
            if !self.document.text(p).is_empty() {
                break;
            }
            p = next;
            self.current_line_num += 1;
        }
        self.current_line = p;
        self.cursor_col = 1;
    }

    /// Up past the current paragraph to the blank line that precedes it.
    pub fn go_to_previous_paragraph(&mut self) {
        if self.document.prev(self.current_line).is_none() {
            return;
        }
        let mut p = self.current_line;
        let mut seen_text = false;
        while let Some(prev) = self.document.prev(p) {
            if !self.document.text(p).is_empty() {
                seen_text = true;
            }
            let stop = seen_text && self.document.text(prev).is_empty();
            p = prev;
            self.current_line_num -= 1;
            if stop {
                break;
            }
        }
        self.current_line = p;
        self.cursor_col = 1;
    }
}
