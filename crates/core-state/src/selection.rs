//! Anchor/cursor selection engine.
//!
//! A selection is the span between a fixed [`SelectionAnchor`] and the
//! moving cursor, normalized so the start never follows the end. The
//! per-line `selected`/`selection_*_col` fields are repaint state derived
//! from that pair by [`EditorBuffer::update_selection`] after every
//! cursor motion while selecting; they are never edited directly.
//!
//! Column ranges are half-open: on the first selected line the span runs
//! from the start column, on the last it ends before the end column, and
//! interior lines are selected in full.

use core_document::{LineId, cols};

use crate::{EditorBuffer, TextArea};

/// Fixed end of an in-progress selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionAnchor {
    pub line: LineId,
    pub line_num: usize,
    pub col: usize,
}

/// Normalized selection bounds, start before end in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start_line: LineId,
    pub start_line_num: usize,
    pub start_col: usize,
    pub end_line: LineId,
    pub end_line_num: usize,
    pub end_col: usize,
}

impl SelectionRange {
    pub fn is_empty(&self) -> bool {
        self.start_line == self.end_line && self.start_col == self.end_col
    }
}

impl EditorBuffer {
    pub fn selecting(&self) -> bool {
        self.anchor.is_some()
    }

    /// Drop the anchor at the cursor unless a selection is already active.
    /// Shift-extended motions call this before moving.
    pub fn begin_selection_if_needed(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(SelectionAnchor {
                line: self.current_line,
                line_num: self.current_line_num,
                col: self.cursor_col,
            });
        }
    }

    /// Forget the anchor and erase all selection paint.
    pub fn clear_selection(&mut self) {
        self.anchor = None;
        let ids: Vec<LineId> = self.document.iter().collect();
        for id in ids {
            self.document.line_mut(id).clear_selection();
        }
    }

    /// Anchor/cursor pair in document order, or `None` when not selecting.
    pub fn normalized_range(&self) -> Option<SelectionRange> {
        let anchor = self.anchor.as_ref()?;
        let a = (anchor.line_num, anchor.col, anchor.line);
        let c = (self.current_line_num, self.cursor_col, self.current_line);
        let (start, end) = if a <= c { (a, c) } else { (c, a) };
        Some(SelectionRange {
            start_line: start.2,
            start_line_num: start.0,
            start_col: start.1,
            end_line: end.2,
            end_line_num: end.0,
            end_col: end.1,
        })
    }

    /// Repaint per-line selection state from the anchor/cursor pair.
    /// Called after every selecting motion.
    pub fn update_selection(&mut self) {
        let Some(range) = self.normalized_range() else {
            return;
        };
        let ids: Vec<LineId> = self.document.iter().collect();
        for id in ids {
            self.document.line_mut(id).clear_selection();
        }
        let mut id = range.start_line;
        loop {
            let end_col = if id == range.end_line {
                range.end_col
            } else {
                cols::col_len(self.document.text(id)) + 1
            };
            let start_col = if id == range.start_line {
                range.start_col
            } else {
                1
            };
            let line = self.document.line_mut(id);
            line.selected = true;
            line.selection_start_col = start_col;
            line.selection_end_col = end_col;
            if id == range.end_line {
                break;
            }
            match self.document.next(id) {
                Some(next) => id = next,
                None => break,
            }
        }
    }

    /// Selected text with embedded newlines, or `None` when not selecting.
    pub fn selected_text(&self) -> Option<String> {
        let range = self.normalized_range()?;
        if range.start_line == range.end_line {
            return Some(
                cols::slice_cols(
                    self.document.text(range.start_line),
                    range.start_col,
                    range.end_col,
                )
                .to_string(),
            );
        }
        let mut out = String::new();
        let mut id = range.start_line;
        loop {
            let text = self.document.text(id);
            if id == range.start_line {
                out.push_str(cols::slice_cols(text, range.start_col, cols::col_len(text) + 1));
            } else if id == range.end_line {
                out.push_str(cols::slice_cols(text, 1, range.end_col));
            } else {
                out.push_str(text);
            }
            if id == range.end_line {
                break;
            }
            out.push('\n');
            match self.document.next(id) {
                Some(next) => id = next,
                None => break,
            }
        }
        Some(out)
    }

    /// Remove the selected span from the document, leaving the cursor at
    /// the selection start. Returns false for no selection or a zero-width
    /// one. Does not snapshot; callers own undo granularity.
    pub fn delete_selected_range(&mut self, area: &TextArea) -> bool {
        let Some(range) = self.normalized_range() else {
            return false;
        };
        if range.is_empty() {
            self.clear_selection();
            return false;
        }

        if range.start_line == range.end_line {
            let line = self.document.line_mut(range.start_line);
            cols::remove_cols(&mut line.text, range.start_col, range.end_col);
        } else {
            // Keep the start line's prefix, append the end line's suffix,
            // then drop everything in between.
            let end_text = self.document.text(range.end_line);
            let suffix = cols::slice_cols(end_text, range.end_col, cols::col_len(end_text) + 1)
                .to_string();
            let start = self.document.line_mut(range.start_line);
            cols::split_off_at_col(&mut start.text, range.start_col);
            start.text.push_str(&suffix);

            let mut id = self.document.next(range.start_line);
            while let Some(victim) = id {
                let next = self.document.next(victim);
                self.document.remove(victim);
                if victim == range.end_line {
                    break;
                }
                id = next;
            }
        }

        self.current_line = range.start_line;
        self.current_line_num = range.start_line_num;
        self.cursor_col = range.start_col;
        // The old viewport top may have been inside the deleted span.
        if !self.document.contains(self.first_visible) {
            self.first_visible = self.current_line;
        }
        self.clear_selection();
        self.changed = true;
        self.update_scroll(area);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{area, buffer_from};

    #[test]
    fn normalization_is_direction_independent() {
        let mut fwd = buffer_from(&["hello world"]);
        fwd.cursor_col = 3;
        fwd.begin_selection_if_needed();
        fwd.cursor_col = 8;
        fwd.update_selection();

        let mut back = buffer_from(&["hello world"]);
        back.cursor_col = 8;
        back.begin_selection_if_needed();
        back.cursor_col = 3;
        back.update_selection();

        let f = fwd.normalized_range().unwrap();
        let b = back.normalized_range().unwrap();
        assert_eq!((f.start_col, f.end_col), (3, 8));
        assert_eq!((b.start_col, b.end_col), (3, 8));
        assert_eq!(fwd.selected_text(), back.selected_text());
        assert_eq!(fwd.selected_text().unwrap(), "llo w");
    }

    #[test]
    fn multi_line_paint_covers_interior_lines_fully() {
        let mut b = buffer_from(&["first", "middle", "last"]);
        b.cursor_col = 3;
        b.begin_selection_if_needed();
        b.move_down();
        b.move_down();
        b.cursor_col = 2;
        b.update_selection();

        let ids: Vec<_> = b.document.iter().collect();
        let first = b.document.line(ids[0]);
        assert!(first.selected);
        assert_eq!((first.selection_start_col, first.selection_end_col), (3, 6));
        let mid = b.document.line(ids[1]);
        assert_eq!((mid.selection_start_col, mid.selection_end_col), (1, 7));
        let last = b.document.line(ids[2]);
        assert_eq!((last.selection_start_col, last.selection_end_col), (1, 2));
        assert_eq!(b.selected_text().unwrap(), "rst\nmiddle\nl");
        assert!(b.check_invariants());
    }

    #[test]
    fn clear_selection_erases_all_paint() {
        let mut b = buffer_from(&["aa", "bb"]);
        b.begin_selection_if_needed();
        b.move_down();
        b.move_end();
        b.update_selection();
        b.clear_selection();
        assert!(!b.selecting());
        assert!(b.check_invariants());
    }

    #[test]
    fn zero_width_selection_deletes_nothing() {
        let mut b = buffer_from(&["abc"]);
        b.cursor_col = 2;
        b.begin_selection_if_needed();
        b.update_selection();
        assert!(!b.delete_selected_range(&area()));
        assert_eq!(b.current_text(), "abc");
        assert!(!b.changed);
    }

    #[test]
    fn same_line_delete_removes_half_open_span() {
        let mut b = buffer_from(&["hello world"]);
        b.cursor_col = 6;
        b.begin_selection_if_needed();
        b.cursor_col = 12;
        b.update_selection();
        assert!(b.delete_selected_range(&area()));
        assert_eq!(b.current_text(), "hello");
        assert_eq!(b.cursor_col, 6);
        assert!(b.changed);
        assert!(b.check_invariants());
    }

    #[test]
    fn multi_line_delete_joins_prefix_and_suffix() {
        let mut b = buffer_from(&["one two", "middle", "three four"]);
        b.cursor_col = 4;
        b.begin_selection_if_needed();
        b.move_down();
        b.move_down();
        b.cursor_col = 6;
        b.update_selection();
        assert!(b.delete_selected_range(&area()));
        assert_eq!(b.document.total_lines(), 1);
        assert_eq!(b.current_text(), "one four");
        assert_eq!((b.current_line_num, b.cursor_col), (1, 4));
        assert!(b.check_invariants());
    }

    #[test]
    fn delete_repairs_viewport_top_inside_the_span() {
        let mut b = buffer_from(&["a", "b", "c", "d"]);
        b.first_visible = b.document.line_id_at(2);
        b.begin_selection_if_needed();
        b.go_to_line(4);
        b.move_end();
        b.update_selection();
        assert!(b.delete_selected_range(&area()));
        assert!(b.document.contains(b.first_visible));
        assert!(b.check_invariants());
    }

    #[test]
    fn selection_reversed_across_lines_normalizes() {
        let mut b = buffer_from(&["alpha", "beta"]);
        b.move_down();
        b.cursor_col = 3;
        b.begin_selection_if_needed();
        b.move_up();
        b.cursor_col = 2;
        b.update_selection();
        assert_eq!(b.selected_text().unwrap(), "lpha\nbe");
    }
}
