//! Line-oriented document store.
//!
//! A document is an ordered sequence of text lines held in a generational
//! arena (`slotmap`), with prev/next `LineId` links replacing the raw
//! pointers a classic doubly-linked list would use. Stable ids survive
//! arbitrary edits around them, so cursor, viewport, and selection anchors
//! can hold a `LineId` without dangling when neighbouring lines are freed.
//!
//! Invariants maintained by every public operation:
//! * A document always contains at least one line, even when "empty".
//! * `total_lines()` equals the number of lines reachable from `head()`.
//! * `prev`/`next` links are mutually consistent along the chain.
//!
//! Navigation is link-hopping: O(1) given a `LineId`, O(n) to reach a line
//! by number. That matches the access pattern of an editor core, where the
//! hot paths already hold an id for the cursor line.

use slotmap::{SlotMap, new_key_type};

pub mod cols;
pub mod io;

new_key_type! {
    /// Stable handle to a line within one [`Document`].
    pub struct LineId;
}

/// One text line plus its transient selection-paint state.
///
/// The selection fields are a repaint cache recomputed on every selection
/// change; the anchor/cursor pair in the owning buffer is the source of
/// truth. Columns are 1-based and half-open: the character at column `c`
/// is selected iff `selection_start_col <= c < selection_end_col`.
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    prev: Option<LineId>,
    next: Option<LineId>,
    pub selected: bool,
    pub selection_start_col: usize,
    pub selection_end_col: usize,
}

impl Line {
    fn new(text: String) -> Self {
        Self {
            text,
            prev: None,
            next: None,
            selected: false,
            selection_start_col: 0,
            selection_end_col: 0,
        }
    }

    /// Clear the selection paint on this line.
    pub fn clear_selection(&mut self) {
        self.selected = false;
        self.selection_start_col = 0;
        self.selection_end_col = 0;
    }
}

/// An ordered, non-empty sequence of [`Line`]s.
#[derive(Debug, Clone)]
pub struct Document {
    lines: SlotMap<LineId, Line>,
    head: LineId,
    total_lines: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding a single empty line.
    pub fn new() -> Self {
        let mut lines = SlotMap::with_key();
        let head = lines.insert(Line::new(String::new()));
        Self {
            lines,
            head,
            total_lines: 1,
        }
    }

    /// Rebuild a document from a list of line texts. An empty list still
    /// produces the mandatory single empty line.
    pub fn from_lines(texts: Vec<String>) -> Self {
        let mut doc = Self::new();
        let mut iter = texts.into_iter();
        if let Some(first) = iter.next() {
            doc.lines[doc.head].text = first;
            let mut tail = doc.head;
            for text in iter {
                tail = doc.insert_after(tail, text);
            }
        }
        doc
    }

    /// First line of the document.
    pub fn head(&self) -> LineId {
        self.head
    }

    /// Live line count. Kept equal to the length of the `head()` chain.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id]
    }

    pub fn line_mut(&mut self, id: LineId) -> &mut Line {
        &mut self.lines[id]
    }

    /// Borrow a line's text.
    pub fn text(&self, id: LineId) -> &str {
        &self.lines[id].text
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.lines.contains_key(id)
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.lines[id].next
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.lines[id].prev
    }

    /// Iterate line ids from the head forward.
    pub fn iter(&self) -> impl Iterator<Item = LineId> + '_ {
        let mut cursor = Some(self.head);
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = self.lines[id].next;
            Some(id)
        })
    }

    /// Id of the 1-based line number `n`, clamped to the last line.
    pub fn line_id_at(&self, n: usize) -> LineId {
        let mut id = self.head;
        for _ in 1..n.max(1) {
            match self.lines[id].next {
                Some(next) => id = next,
                None => break,
            }
        }
        id
    }

    /// 1-based line number of `id`, found by walking from the head.
    pub fn line_number_of(&self, id: LineId) -> usize {
        let mut n = 1;
        let mut cursor = self.head;
        while cursor != id {
            match self.lines[cursor].next {
                Some(next) => {
                    cursor = next;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// Insert a new line containing `text` immediately after `after`.
    pub fn insert_after(&mut self, after: LineId, text: String) -> LineId {
        let old_next = self.lines[after].next;
        let id = self.lines.insert(Line::new(text));
        self.lines[id].prev = Some(after);
        self.lines[id].next = old_next;
        self.lines[after].next = Some(id);
        if let Some(next) = old_next {
            self.lines[next].prev = Some(id);
        }
        self.total_lines += 1;
        id
    }

    /// Remove `id`, splicing its neighbours together, and return its text.
    /// Removing the last remaining line is refused: a document never goes
    /// empty.
    pub fn remove(&mut self, id: LineId) -> Option<String> {
        if self.total_lines == 1 {
            return None;
        }
        let Line { prev, next, .. } = self.lines[id];
        if let Some(p) = prev {
            self.lines[p].next = next;
        }
        if let Some(n) = next {
            self.lines[n].prev = prev;
        }
        if id == self.head {
            // `next` must exist because total_lines > 1.
            self.head = next.expect("non-head line without predecessor");
        }
        self.total_lines -= 1;
        self.lines.remove(id).map(|line| line.text)
    }

    /// Copy out every line's text in order (undo snapshot payload).
    pub fn snapshot_texts(&self) -> Vec<String> {
        self.iter().map(|id| self.lines[id].text.clone()).collect()
    }
}
