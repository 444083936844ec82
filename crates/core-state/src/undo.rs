//! Whole-buffer undo/redo history.
//!
//! Each record is a full snapshot: every line's text plus the cursor and
//! viewport position at the moment the snapshot was taken. Restoring a
//! record rebuilds the line arena from the texts and relocates the cursor
//! and viewport top by line number, so no `LineId` ever crosses a restore.
//!
//! Every mutating operation calls [`EditorBuffer::create_undo_point`]
//! exactly once, before it touches the buffer. The history is bounded at
//! [`UNDO_HISTORY_MAX`] records; the oldest is evicted first. A new undo
//! point invalidates the redo stack.

use tracing::trace;

use core_document::Document;

use crate::{EditorBuffer, TextArea};

/// Maximum retained undo records per buffer.
pub const UNDO_HISTORY_MAX: usize = 100;

/// Full-buffer snapshot, sufficient to restore text, cursor, and viewport.
#[derive(Debug, Clone)]
pub struct UndoRecord {
    lines: Vec<String>,
    cursor_line_num: usize,
    cursor_col: usize,
    first_visible_line_num: usize,
}

impl EditorBuffer {
    fn capture_record(&self) -> UndoRecord {
        UndoRecord {
            lines: self.document.snapshot_texts(),
            cursor_line_num: self.current_line_num,
            cursor_col: self.cursor_col,
            first_visible_line_num: self.first_visible_line_num(),
        }
    }

    /// Snapshot the buffer onto the undo stack. Called once at the start
    /// of every mutating operation.
    pub fn create_undo_point(&mut self) {
        self.undo_stack.push_back(self.capture_record());
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        trace!(target: "state.undo", depth = self.undo_stack.len(), "undo_point");
    }

    /// Restore the most recent undo record, pushing the present state onto
    /// the redo stack. Returns false when there is nothing to undo.
    pub fn undo(&mut self, area: &TextArea) -> bool {
        let Some(record) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push_back(self.capture_record());
        self.restore_record(record, area);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo");
        true
    }

    /// Inverse of [`undo`](Self::undo). Returns false when the redo stack
    /// is empty.
    pub fn redo(&mut self, area: &TextArea) -> bool {
        let Some(record) = self.redo_stack.pop_back() else {
            return false;
        };
        self.undo_stack.push_back(self.capture_record());
        self.restore_record(record, area);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo");
        true
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop both histories (used when a buffer is reloaded from disk).
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn restore_record(&mut self, record: UndoRecord, area: &TextArea) {
        self.document = Document::from_lines(record.lines);
        self.anchor = None;

        let total = self.document.total_lines();
        let line_num = record.cursor_line_num.clamp(1, total);
        self.current_line = self.document.line_id_at(line_num);
        self.current_line_num = line_num;
        self.cursor_col = record.cursor_col;
        self.clamp_cursor_col();

        let fv_num = record.first_visible_line_num.clamp(1, total);
        self.first_visible = self.document.line_id_at(fv_num);
        self.cursor_screen_y = area.top + self.current_line_num.saturating_sub(fv_num);
        self.changed = true;
        self.update_scroll(area);
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{area, buffer_from};

    #[test]
    fn undo_restores_text_cursor_and_viewport() {
        let mut b = buffer_from(&["alpha", "beta"]);
        b.cursor_col = 3;
        b.create_undo_point();
        b.document.line_mut(b.current_line).text = "ALPHA".into();
        b.cursor_col = 6;

        assert!(b.undo(&area()));
        assert_eq!(b.current_text(), "alpha");
        assert_eq!(b.cursor_col, 3);
        assert!(b.check_invariants());
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut b = buffer_from(&["x"]);
        assert!(!b.undo(&area()));
        assert!(!b.redo(&area()));
        assert_eq!(b.current_text(), "x");
    }

    #[test]
    fn redo_is_the_inverse_of_undo() {
        let mut b = buffer_from(&["one"]);
        b.create_undo_point();
        b.document.line_mut(b.current_line).text = "two".into();
        b.create_undo_point();
        b.document.line_mut(b.current_line).text = "three".into();

        assert!(b.undo(&area()));
        assert_eq!(b.current_text(), "two");
        assert!(b.undo(&area()));
        assert_eq!(b.current_text(), "one");
        assert!(b.redo(&area()));
        assert_eq!(b.current_text(), "two");
        assert!(b.redo(&area()));
        assert_eq!(b.current_text(), "three");
        assert!(!b.redo(&area()));
    }

    #[test]
    fn new_undo_point_clears_redo() {
        let mut b = buffer_from(&["a"]);
        b.create_undo_point();
        b.document.line_mut(b.current_line).text = "b".into();
        b.undo(&area());
        assert_eq!(b.redo_depth(), 1);
        b.create_undo_point();
        assert_eq!(b.redo_depth(), 0);
    }

    #[test]
    fn history_is_bounded_with_oldest_evicted() {
        let mut b = buffer_from(&["0"]);
        for i in 1..=super::UNDO_HISTORY_MAX + 10 {
            b.create_undo_point();
            b.document.line_mut(b.current_line).text = i.to_string();
        }
        assert_eq!(b.undo_depth(), super::UNDO_HISTORY_MAX);
        while b.undo(&area()) {}
        // The ten oldest snapshots were evicted.
        assert_eq!(b.current_text(), "10");
        assert!(b.check_invariants());
    }

    #[test]
    fn restore_clamps_cursor_into_the_snapshot() {
        let mut b = buffer_from(&["short", "a much longer line"]);
        b.create_undo_point();
        b.move_down();
        b.move_end();
        b.document.line_mut(b.current_line).text = "tiny".into();
        assert!(b.undo(&area()));
        assert!(b.check_invariants());
    }
}
