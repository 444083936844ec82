//! Per-buffer editor state: cursor, viewport, selection anchor, and the
//! undo/redo history, layered over the `core-document` line arena.
//!
//! One [`EditorBuffer`] is the unit of an open file. All coordinates are
//! 1-based: `current_line_num` counts lines from the head, `cursor_col`
//! counts character columns with `len + 1` being the insert position after
//! the last character. `cursor_screen_y` and the horizontal scroll offset
//! are derived from the logical position by [`EditorBuffer::update_scroll`]
//! after every motion or edit, never maintained incrementally.
//!
//! Invariants held after every public operation:
//! 1. `current_line_num` names the position of `current_line` in the chain.
//! 2. `1 <= cursor_col <= col_len(current line) + 1`.
//! 3. The document's line count matches the reachable chain (enforced one
//!    level down, in `core-document`).
//! 4. An active selection anchor always addresses a live line.
//! 5. Selection paint on lines mirrors the anchor/cursor range.
//! 6. Undo history is bounded (see `undo::UNDO_HISTORY_MAX`).
//!
//! The state is deliberately free of any rendering or keymap concern; the
//! application layer decides *when* to call these operations, this crate
//! decides *what* they do to the buffer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use core_document::io::{read_document, write_document};
use core_document::{Document, LineId, cols};

pub mod motion;
pub mod selection;
pub mod undo;

pub use selection::SelectionAnchor;
pub use undo::{UNDO_HISTORY_MAX, UndoRecord};

/// Geometry of the text viewport, supplied by the (external) renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextArea {
    /// Screen row of the first text line.
    pub top: usize,
    /// Visible rows.
    pub height: usize,
    /// Visible columns.
    pub width: usize,
}

impl TextArea {
    pub fn new(top: usize, height: usize, width: usize) -> Self {
        Self { top, height, width }
    }
}

/// All mutable state of one open file.
#[derive(Debug, Clone)]
pub struct EditorBuffer {
    pub document: Document,
    pub filename: PathBuf,
    /// Unsaved modifications exist.
    pub changed: bool,
    /// No confirmed on-disk path yet (Save must prompt).
    pub is_new_file: bool,
    /// Insert vs overwrite typing.
    pub insert_mode: bool,
    pub current_line: LineId,
    pub current_line_num: usize,
    pub cursor_col: usize,
    pub first_visible: LineId,
    /// 1-based leftmost visible column.
    pub horizontal_scroll_offset: usize,
    /// Derived screen row of the cursor; valid after `update_scroll`.
    pub cursor_screen_y: usize,
    pub(crate) anchor: Option<SelectionAnchor>,
    pub(crate) undo_stack: std::collections::VecDeque<UndoRecord>,
    pub(crate) redo_stack: std::collections::VecDeque<UndoRecord>,
}

impl EditorBuffer {
    /// Fresh unsaved buffer with a single empty line.
    pub fn untitled(filename: impl Into<PathBuf>) -> Self {
        let document = Document::new();
        let head = document.head();
        Self {
            document,
            filename: filename.into(),
            changed: false,
            is_new_file: true,
            insert_mode: true,
            current_line: head,
            current_line_num: 1,
            cursor_col: 1,
            first_visible: head,
            horizontal_scroll_offset: 1,
            cursor_screen_y: 0,
            anchor: None,
            undo_stack: std::collections::VecDeque::new(),
            redo_stack: std::collections::VecDeque::new(),
        }
    }

    /// Open `path`. A missing or unreadable path behaves like starting a
    /// new file at that path.
    pub fn open(path: &Path) -> Self {
        let outcome = read_document(path);
        let mut buffer = Self::untitled(path);
        let head = outcome.document.head();
        buffer.document = outcome.document;
        buffer.current_line = head;
        buffer.first_visible = head;
        buffer.is_new_file = !outcome.existed;
        debug!(target: "state.buffer", path = %path.display(), lines = buffer.document.total_lines(), new_file = buffer.is_new_file, "open");
        buffer
    }

    /// Write the buffer back to its filename. The dirty flag is only
    /// cleared on success, so a failed save keeps the risk visible.
    pub fn save(&mut self) -> Result<()> {
        write_document(&self.filename, &self.document)
            .with_context(|| format!("save {}", self.filename.display()))?;
        self.changed = false;
        self.is_new_file = false;
        debug!(target: "state.buffer", path = %self.filename.display(), "saved");
        Ok(())
    }

    /// Save under a new path, adopting it as the buffer's filename.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.filename = path.into();
        self.save()
    }

    /// Text of the cursor line.
    pub fn current_text(&self) -> &str {
        self.document.text(self.current_line)
    }

    /// 1-based line number of the viewport top, derived by walking from
    /// the head.
    pub fn first_visible_line_num(&self) -> usize {
        self.document.line_number_of(self.first_visible)
    }

    /// Clamp the cursor column into `[1, len + 1]` for the current line.
    pub fn clamp_cursor_col(&mut self) {
        let max = cols::col_len(self.current_text()) + 1;
        if self.cursor_col > max {
            self.cursor_col = max;
        }
        if self.cursor_col < 1 {
            self.cursor_col = 1;
        }
    }

    /// Re-derive viewport top, horizontal offset, and cursor screen row
    /// from the logical cursor position.
    ///
    /// Vertical: above the window snaps the top to the cursor line; below
    /// it walks `height - 1` links back so the cursor becomes the last
    /// visible row. Horizontal: the offset follows the cursor so it stays
    /// inside `[offset, offset + width)`.
    pub fn update_scroll(&mut self, area: &TextArea) {
        self.clamp_cursor_col();

        if area.height == 0 {
            return;
        }
        let mut first_visible_num = self.first_visible_line_num();
        if self.current_line_num < first_visible_num {
            self.first_visible = self.current_line;
            first_visible_num = self.current_line_num;
        } else if self.current_line_num >= first_visible_num + area.height {
            let mut new_top = self.current_line;
            for _ in 0..area.height - 1 {
                match self.document.prev(new_top) {
                    Some(prev) => new_top = prev,
                    None => break,
                }
            }
            self.first_visible = new_top;
            first_visible_num = self.current_line_num - (area.height - 1);
        }
        self.cursor_screen_y = area.top + (self.current_line_num - first_visible_num);

        if area.width == 0 {
            return;
        }
        if self.cursor_col < self.horizontal_scroll_offset {
            self.horizontal_scroll_offset = self.cursor_col;
        } else if self.cursor_col >= self.horizontal_scroll_offset + area.width {
            self.horizontal_scroll_offset = self.cursor_col - area.width + 1;
        }
    }

    /// Verify the documented invariants; test support.
    pub fn check_invariants(&self) -> bool {
        if !self.document.contains(self.current_line) || !self.document.contains(self.first_visible)
        {
            return false;
        }
        if self.document.line_number_of(self.current_line) != self.current_line_num {
            return false;
        }
        let max_col = cols::col_len(self.current_text()) + 1;
        if self.cursor_col < 1 || self.cursor_col > max_col {
            return false;
        }
        if self.document.total_lines() != self.document.iter().count() {
            return false;
        }
        match &self.anchor {
            Some(a) => {
                if !self.document.contains(a.line) {
                    return false;
                }
                if self.document.line_number_of(a.line) != a.line_num {
                    return false;
                }
            }
            None => {
                // No anchor: no line may carry selection paint.
                if self
                    .document
                    .iter()
                    .any(|id| self.document.line(id).selected)
                {
                    return false;
                }
            }
        }
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            return false;
        }
        true
    }
}

/// The open buffers of a session, addressed by explicit index. Exactly one
/// is active; every core operation receives the buffer it acts on, so this
/// container is bookkeeping only.
#[derive(Debug)]
pub struct BufferSet {
    buffers: Vec<EditorBuffer>,
    active: usize,
}

impl BufferSet {
    pub fn new(initial: EditorBuffer) -> Self {
        Self {
            buffers: vec![initial],
            active: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &EditorBuffer {
        &self.buffers[self.active]
    }

    pub fn active_mut(&mut self) -> &mut EditorBuffer {
        &mut self.buffers[self.active]
    }

    pub fn get(&self, index: usize) -> Option<&EditorBuffer> {
        self.buffers.get(index)
    }

    /// Add a buffer and make it active.
    pub fn add(&mut self, buffer: EditorBuffer) {
        self.buffers.push(buffer);
        self.active = self.buffers.len() - 1;
    }

    pub fn switch_to(&mut self, index: usize) -> bool {
        if index < self.buffers.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn next_window(&mut self) {
        if self.buffers.len() > 1 {
            self.active = (self.active + 1) % self.buffers.len();
        }
    }

    pub fn previous_window(&mut self) {
        if self.buffers.len() > 1 {
            self.active = (self.active + self.buffers.len() - 1) % self.buffers.len();
        }
    }

    /// Remove the active buffer and return it (the caller decides whether
    /// to save first). An untitled buffer replaces the last one closed so
    /// the set never goes empty.
    pub fn close_active(&mut self) -> EditorBuffer {
        let closed = self.buffers.remove(self.active);
        if self.buffers.is_empty() {
            self.buffers.push(EditorBuffer::untitled("untitled.txt"));
        }
        if self.active >= self.buffers.len() {
            self.active = self.buffers.len() - 1;
        }
        closed
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{area, buffer_from};
    use super::*;

    #[test]
    fn untitled_buffer_satisfies_invariants() {
        let b = EditorBuffer::untitled("new_file.txt");
        assert!(b.check_invariants());
        assert_eq!(b.current_line_num, 1);
        assert_eq!(b.cursor_col, 1);
        assert!(b.is_new_file);
    }

    #[test]
    fn open_missing_path_starts_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let b = EditorBuffer::open(&dir.path().join("nope.c"));
        assert!(b.is_new_file);
        assert_eq!(b.document.total_lines(), 1);
        assert!(b.check_invariants());
    }

    #[test]
    fn save_clears_dirty_flag_only_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = buffer_from(&["hello"]);
        b.filename = dir.path().join("out.txt");
        b.changed = true;
        b.save().unwrap();
        assert!(!b.changed);
        assert!(!b.is_new_file);

        b.changed = true;
        b.filename = dir.path().join("missing-dir").join("out.txt");
        assert!(b.save().is_err());
        assert!(b.changed, "failed save must keep the buffer dirty");
    }

    #[test]
    fn scroll_down_keeps_cursor_on_last_row() {
        let lines: Vec<String> = (1..=50).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let mut b = buffer_from(&refs);
        let area = area();
        // Jump far below the window.
        b.current_line = b.document.line_id_at(25);
        b.current_line_num = 25;
        b.update_scroll(&area);
        assert_eq!(b.first_visible_line_num(), 25 - (area.height - 1));
        assert_eq!(b.cursor_screen_y, area.top + area.height - 1);
        assert!(b.check_invariants());
    }

    #[test]
    fn scroll_up_snaps_top_to_cursor() {
        let lines: Vec<String> = (1..=50).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let mut b = buffer_from(&refs);
        let area = area();
        b.first_visible = b.document.line_id_at(30);
        b.current_line = b.document.line_id_at(5);
        b.current_line_num = 5;
        b.update_scroll(&area);
        assert_eq!(b.first_visible_line_num(), 5);
        assert_eq!(b.cursor_screen_y, area.top);
    }

    #[test]
    fn horizontal_offset_follows_cursor() {
        let long = "x".repeat(200);
        let mut b = buffer_from(&[long.as_str()]);
        let area = area();
        b.cursor_col = 120;
        b.update_scroll(&area);
        assert_eq!(b.horizontal_scroll_offset, 120 - area.width + 1);
        b.cursor_col = 3;
        b.update_scroll(&area);
        assert_eq!(b.horizontal_scroll_offset, 3);
    }

    #[test]
    fn cursor_col_clamped_after_line_shrinks() {
        let mut b = buffer_from(&["long line here"]);
        b.cursor_col = 99;
        b.update_scroll(&area());
        assert_eq!(b.cursor_col, cols::col_len("long line here") + 1);
    }

    #[test]
    fn buffer_set_cycles_and_never_goes_empty() {
        let mut set = BufferSet::new(EditorBuffer::untitled("a.txt"));
        set.add(EditorBuffer::untitled("b.txt"));
        set.add(EditorBuffer::untitled("c.txt"));
        assert_eq!(set.active_index(), 2);
        set.next_window();
        assert_eq!(set.active_index(), 0);
        set.previous_window();
        assert_eq!(set.active_index(), 2);
        assert!(set.switch_to(1));
        assert!(!set.switch_to(9));
        let closed = set.close_active();
        assert_eq!(closed.filename, PathBuf::from("b.txt"));
        assert_eq!(set.len(), 2);
        set.close_active();
        set.close_active();
        assert_eq!(set.len(), 1, "a fresh untitled buffer takes over");
    }
}
