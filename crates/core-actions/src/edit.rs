//! Text mutation operations: typing, newline with smart indent, deletion,
//! tab, comment toggling, and the clipboard trio.
//!
//! Shared contract: each public function here snapshots the buffer once
//! via `create_undo_point` before mutating, consumes an active selection
//! where the operation defines it, and finishes with `update_scroll` so
//! the derived viewport state stays valid.

use tracing::trace;

use core_config::Config;
use core_document::cols;
use core_state::{EditorBuffer, TextArea};

const LINE_COMMENT: &str = "//";

/// Insert (or overwrite, in overwrite mode) one character at the cursor.
///
/// With smart indentation enabled, typing a closing bracket on an
/// all-blank line aligns it under the line that opened the block, so `}`
/// lands at the indentation of its matching `{`.
pub fn type_char(buf: &mut EditorBuffer, cfg: &Config, area: &TextArea, c: char) {
    buf.create_undo_point();
    if buf.selecting() {
        buf.delete_selected_range(area);
    }

    if cfg.smart_indentation && matches!(c, ')' | ']' | '}') && smart_block_close(buf, c) {
        buf.changed = true;
        buf.update_scroll(area);
        return;
    }

    let col = buf.cursor_col;
    let insert_mode = buf.insert_mode;
    let line = buf.document.line_mut(buf.current_line);
    if !insert_mode && col <= cols::col_len(&line.text) {
        cols::remove_cols(&mut line.text, col, col + 1);
    }
    cols::insert_at_col(&mut line.text, col, &c.to_string());
    buf.cursor_col += 1;
    buf.changed = true;
    buf.update_scroll(area);
}

/// Align a closing bracket typed on an all-blank line to its matching
/// open bracket: scan backwards counting nesting, and on a match replace
/// the line with that line's leading whitespace plus the bracket.
/// Returns false (insert normally) when the line has text or no matching
/// bracket exists above.
fn smart_block_close(buf: &mut EditorBuffer, c: char) -> bool {
    let open = match c {
        ')' => '(',
        ']' => '[',
        '}' => '{',
        _ => return false,
    };
    if cols::first_non_blank_col(buf.current_text()).is_some() {
        return false;
    }

    let mut nesting = 0usize;
    let mut id = buf.current_line;
    let mut scan_limit = Some(buf.cursor_col.saturating_sub(1));
    loop {
        let chars: Vec<char> = buf.document.text(id).chars().collect();
        let upto = match scan_limit.take() {
            Some(limit) => limit.min(chars.len()),
            None => chars.len(),
        };
        for i in (0..upto).rev() {
            if chars[i] == c {
                nesting += 1;
            } else if chars[i] == open {
                if nesting == 0 {
                    let indent = cols::leading_whitespace(buf.document.text(id)).to_string();
                    buf.document.line_mut(buf.current_line).text = format!("{indent}{c}");
                    buf.cursor_col = cols::col_len(&indent) + 2;
                    return true;
                }
                nesting -= 1;
            }
        }
        match buf.document.prev(id) {
            Some(prev) => id = prev,
            None => return false,
        }
    }
}

/// Split the current line at the cursor.
///
/// With smart indentation the new line inherits the old line's leading
/// whitespace, plus one extra level when the old line opens a block
/// (ends with `{` once a trailing `//` comment is ignored).
pub fn insert_newline(buf: &mut EditorBuffer, cfg: &Config, area: &TextArea) {
    buf.create_undo_point();
    if buf.selecting() {
        buf.delete_selected_range(area);
    }

    let indent = if cfg.smart_indentation {
        let text = buf.current_text();
        let mut indent = cols::leading_whitespace(text).to_string();
        if opens_block(cols::slice_cols(text, 1, buf.cursor_col)) {
            indent.push_str(&" ".repeat(cfg.indentation_width));
        }
        indent
    } else {
        String::new()
    };

    let col = buf.cursor_col;
    let line = buf.document.line_mut(buf.current_line);
    let tail = cols::split_off_at_col(&mut line.text, col);

    let new_text = format!("{indent}{tail}");
    let new_id = buf.document.insert_after(buf.current_line, new_text);
    buf.current_line = new_id;
    buf.current_line_num += 1;
    buf.cursor_col = cols::col_len(&indent) + 1;
    buf.horizontal_scroll_offset = 1;
    buf.changed = true;
    buf.update_scroll(area);
    trace!(target: "actions.edit", line = buf.current_line_num, "newline");
}

/// True when `text` ends an open block: trailing `{` after stripping
/// whitespace and any `//` comment tail.
fn opens_block(text: &str) -> bool {
    let code = match text.find(LINE_COMMENT) {
        Some(pos) => &text[..pos],
        None => text,
    };
    code.trim_end().ends_with('{')
}

/// Delete backwards. With a selection, removes the selection and nothing
/// more. At column 1, joins the line onto its predecessor.
pub fn backspace(buf: &mut EditorBuffer, area: &TextArea) {
    buf.create_undo_point();
    if buf.selecting() {
        if buf.delete_selected_range(area) {
            return;
        }
    }
    if buf.cursor_col > 1 {
        let col = buf.cursor_col;
        let line = buf.document.line_mut(buf.current_line);
        cols::remove_cols(&mut line.text, col - 1, col);
        buf.cursor_col -= 1;
        buf.changed = true;
    } else if let Some(prev) = buf.document.prev(buf.current_line) {
        let removed = buf
            .document
            .remove(buf.current_line)
            .unwrap_or_default();
        let join_col = cols::col_len(buf.document.text(prev)) + 1;
        buf.document.line_mut(prev).text.push_str(&removed);
        buf.current_line = prev;
        buf.current_line_num -= 1;
        buf.cursor_col = join_col;
        if !buf.document.contains(buf.first_visible) {
            buf.first_visible = buf.current_line;
        }
        buf.changed = true;
    }
    buf.update_scroll(area);
}

/// Delete forwards. With a selection, removes the selection and nothing
/// more. At end of line, joins the next line onto this one.
pub fn delete_forward(buf: &mut EditorBuffer, area: &TextArea) {
    buf.create_undo_point();
    if buf.selecting() {
        if buf.delete_selected_range(area) {
            return;
        }
    }
    let col = buf.cursor_col;
    if col <= cols::col_len(buf.current_text()) {
        let line = buf.document.line_mut(buf.current_line);
        cols::remove_cols(&mut line.text, col, col + 1);
        buf.changed = true;
    } else if let Some(next) = buf.document.next(buf.current_line) {
        if !buf.document.contains(buf.first_visible) || buf.first_visible == next {
            buf.first_visible = buf.current_line;
        }
        let removed = buf.document.remove(next).unwrap_or_default();
        buf.document.line_mut(buf.current_line).text.push_str(&removed);
        buf.changed = true;
    }
    buf.update_scroll(area);
}

/// Tab key: left of the first non-blank character it just moves there;
/// otherwise it inserts one level of indentation.
pub fn insert_tab(buf: &mut EditorBuffer, cfg: &Config, area: &TextArea) {
    if let Some(first) = cols::first_non_blank_col(buf.current_text()) {
        if buf.cursor_col < first {
            buf.cursor_col = first;
            buf.update_scroll(area);
            return;
        }
    }
    buf.create_undo_point();
    let spaces = " ".repeat(cfg.indentation_width);
    let col = buf.cursor_col;
    let line = buf.document.line_mut(buf.current_line);
    cols::insert_at_col(&mut line.text, col, &spaces);
    buf.cursor_col += cfg.indentation_width;
    buf.changed = true;
    buf.update_scroll(area);
}

/// Toggle `//` comments on the current line, or on every line of the
/// selection. Markers go in front of the first non-blank character, so
/// indentation is preserved. A block is uncommented only when all of its
/// non-blank lines are commented; otherwise the whole block gains
/// markers, skipping blank lines. A lone blank line still gains one.
pub fn toggle_comment(buf: &mut EditorBuffer, area: &TextArea) {
    buf.create_undo_point();

    if buf.selecting() {
        let range = buf.normalized_range();
        let (start_num, end_num) = match range {
            Some(r) => (r.start_line_num, r.end_line_num),
            None => (buf.current_line_num, buf.current_line_num),
        };
        let ids: Vec<_> = {
            let mut ids = Vec::with_capacity(end_num - start_num + 1);
            let mut id = buf.document.line_id_at(start_num);
            for _ in start_num..=end_num {
                ids.push(id);
                match buf.document.next(id) {
                    Some(next) => id = next,
                    None => break,
                }
            }
            ids
        };

        // Blank lines never disqualify an uncomment pass.
        let all_commented = ids.iter().all(|&id| {
            let text = buf.document.text(id);
            match first_non_blank(text) {
                Some(pos) => text[pos..].starts_with(LINE_COMMENT),
                None => true,
            }
        });

        for &id in &ids {
            let line = buf.document.line_mut(id);
            if all_commented {
                uncomment_line(&mut line.text);
            } else if let Some(pos) = first_non_blank(&line.text) {
                line.text.insert_str(pos, "// ");
            }
        }
        buf.update_selection();
        trace!(target: "actions.edit", lines = ids.len(), uncommented = all_commented, "toggle_comment");
    } else {
        let line = buf.document.line_mut(buf.current_line);
        if !uncomment_line(&mut line.text) {
            let at = first_non_blank(&line.text).unwrap_or(0);
            line.text.insert_str(at, "// ");
        }
    }

    buf.clamp_cursor_col();
    buf.changed = true;
    buf.update_scroll(area);
}

fn first_non_blank(text: &str) -> Option<usize> {
    text.find(|c: char| c != ' ' && c != '\t')
}

/// Strip a `//` marker (plus one following space) sitting at the first
/// non-blank position. Returns false when the line is not commented.
fn uncomment_line(text: &mut String) -> bool {
    let Some(pos) = first_non_blank(text) else {
        return false;
    };
    if !text[pos..].starts_with(LINE_COMMENT) {
        return false;
    }
    let mut end = pos + LINE_COMMENT.len();
    if text[end..].starts_with(' ') {
        end += 1;
    }
    text.replace_range(pos..end, "");
    true
}

/// Selected text for the clipboard, if any. Leaves the buffer untouched.
pub fn copy_selection(buf: &EditorBuffer) -> Option<String> {
    buf.selected_text().filter(|s| !s.is_empty())
}

/// Copy and then remove the selection. One undo step.
pub fn cut_selection(buf: &mut EditorBuffer, area: &TextArea) -> Option<String> {
    let text = copy_selection(buf)?;
    buf.create_undo_point();
    buf.delete_selected_range(area);
    Some(text)
}

/// Insert clipboard text at the cursor, replacing any active selection.
/// Multi-line text splices new lines in; the cursor lands after the last
/// inserted character.
pub fn paste(buf: &mut EditorBuffer, area: &TextArea, clipboard: &str) {
    if clipboard.is_empty() {
        return;
    }
    buf.create_undo_point();
    if buf.selecting() {
        buf.delete_selected_range(area);
    }

    let mut segments = clipboard.split('\n');
    // split always yields at least one element
    let first = segments.next().unwrap_or_default();
    let rest: Vec<&str> = segments.collect();

    let col = buf.cursor_col;
    if rest.is_empty() {
        let line = buf.document.line_mut(buf.current_line);
        cols::insert_at_col(&mut line.text, col, first);
        buf.cursor_col += cols::col_len(first);
    } else {
        let line = buf.document.line_mut(buf.current_line);
        let tail = cols::split_off_at_col(&mut line.text, col);
        line.text.push_str(first);

        let mut at = buf.current_line;
        for segment in &rest[..rest.len() - 1] {
            at = buf.document.insert_after(at, segment.to_string());
        }
        let last = rest[rest.len() - 1];
        at = buf.document.insert_after(at, format!("{last}{tail}"));
        buf.current_line = at;
        buf.current_line_num += rest.len();
        buf.cursor_col = cols::col_len(last) + 1;
    }
    buf.changed = true;
    buf.update_scroll(area);
    trace!(target: "actions.edit", lines = rest.len() + 1, "paste");
}
