//! Viewport composition: turns buffer state plus syntax tokens into
//! styled text rows a terminal frontend can paint directly.
//!
//! Everything here is a pure projection of `EditorBuffer` state. The
//! scanner state for the first visible line is derived by folding the
//! tokenizer over the lines above the viewport, so a window opened in
//! the middle of a block comment renders correctly.
//!
//! Selection always wins over syntax colour, matching how the cursor
//! line reads in every terminal editor.

use tracing::trace;

use core_config::Config;
use core_document::cols;
use core_state::{EditorBuffer, TextArea};
use core_syntax::{HighlightClass, ScanState, Syntax, parse_line, scan_state_after};

/// One run of visually identical cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub class: HighlightClass,
    pub selected: bool,
}

/// One rendered viewport row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line_num: usize,
    pub spans: Vec<Span>,
}

/// Width of the line-number gutter: digits of the largest line number
/// plus one space, or zero when the gutter is disabled.
pub fn gutter_width(cfg: &Config, total_lines: usize) -> usize {
    if !cfg.show_line_numbers {
        return 0;
    }
    let digits = total_lines.max(1).ilog10() as usize + 1;
    digits + 1
}

/// Compose the styled rows for the visible window.
///
/// `area.width` is the text width, after any gutter. Rows are clipped to
/// the horizontal scroll window; short or scrolled-out lines produce a
/// row with no spans.
pub fn visible_rows(buf: &EditorBuffer, syntax: &Syntax, area: &TextArea) -> Vec<Row> {
    let first_num = buf.first_visible_line_num();
    let mut state = scan_state_after(
        syntax,
        buf.document
            .iter()
            .take(first_num - 1)
            .map(|id| buf.document.text(id)),
    );

    let mut rows = Vec::with_capacity(area.height);
    let mut id = Some(buf.first_visible);
    for row_index in 0..area.height {
        let Some(line_id) = id else { break };
        let text = buf.document.text(line_id);
        let (tokens, next_state) = parse_line(syntax, state, text);
        state = next_state;

        let line = buf.document.line(line_id);
        let selection = line
            .selected
            .then_some((line.selection_start_col, line.selection_end_col));
        rows.push(Row {
            line_num: first_num + row_index,
            spans: compose_spans(
                text,
                &tokens,
                selection,
                buf.horizontal_scroll_offset,
                area.width,
            ),
        });
        id = buf.document.next(line_id);
    }
    trace!(target: "render", rows = rows.len(), first = first_num, "compose");
    rows
}

/// Clip one line to the horizontal window and merge its cells into runs.
fn compose_spans(
    text: &str,
    tokens: &[core_syntax::Token],
    selection: Option<(usize, usize)>,
    scroll_offset: usize,
    width: usize,
) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    if width == 0 {
        return spans;
    }
    let last_col = scroll_offset + width;
    for (col0, (byte, c)) in text.char_indices().enumerate() {
        let col = col0 + 1;
        if col < scroll_offset {
            continue;
        }
        if col >= last_col {
            break;
        }
        let class = tokens
            .iter()
            .find(|t| t.start <= byte && byte < t.end)
            .map(|t| t.class)
            .unwrap_or(HighlightClass::Default);
        let selected = selection.is_some_and(|(start, end)| start <= col && col < end);
        match spans.last_mut() {
            Some(last) if last.class == class && last.selected == selected => last.text.push(c),
            _ => spans.push(Span {
                text: c.to_string(),
                class,
                selected,
            }),
        }
    }
    spans
}

/// Cursor position in screen cells, including the gutter offset. Valid
/// once `update_scroll` has run for the current geometry; the row comes
/// straight from `cursor_screen_y`.
pub fn cursor_screen_position(buf: &EditorBuffer, cfg: &Config) -> (usize, usize) {
    let gutter = gutter_width(cfg, buf.document.total_lines());
    let x = gutter + (buf.cursor_col - buf.horizontal_scroll_offset);
    (x, buf.cursor_screen_y)
}

/// Vertical thumb position in `[0, 1]`: 0 with the first line at the top,
/// 1 with the last page fully visible.
pub fn vertical_scroll_ratio(buf: &EditorBuffer, page_height: usize) -> f64 {
    let total = buf.document.total_lines();
    if total <= page_height {
        return 0.0;
    }
    let first = buf.first_visible_line_num() - 1;
    (first as f64 / (total - page_height) as f64).clamp(0.0, 1.0)
}

/// Horizontal analogue, against the current line's length.
pub fn horizontal_scroll_ratio(buf: &EditorBuffer, width: usize) -> f64 {
    let line_len = cols::col_len(buf.current_text());
    if line_len <= width || width == 0 {
        return 0.0;
    }
    let offset = buf.horizontal_scroll_offset - 1;
    (offset as f64 / (line_len - width) as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_document::Document;
    use core_syntax::SyntaxKind;

    fn buffer_from(lines: &[&str]) -> EditorBuffer {
        let mut b = EditorBuffer::untitled("test.c");
        b.document = Document::from_lines(lines.iter().map(|s| s.to_string()).collect());
        b.current_line = b.document.head();
        b.first_visible = b.document.head();
        b
    }

    fn c_syntax() -> Syntax {
        Syntax::for_kind(SyntaxKind::CCpp)
    }

    fn row_text(row: &Row) -> String {
        row.spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn rows_cover_the_window_and_stop_at_document_end() {
        let b = buffer_from(&["one", "two", "three"]);
        let rows = visible_rows(&b, &c_syntax(), &TextArea::new(0, 10, 40));
        assert_eq!(rows.len(), 3);
        assert_eq!(row_text(&rows[0]), "one");
        assert_eq!(rows[2].line_num, 3);
    }

    #[test]
    fn keyword_span_is_classified() {
        let b = buffer_from(&["return x;"]);
        let rows = visible_rows(&b, &c_syntax(), &TextArea::new(0, 1, 40));
        let kw = rows[0]
            .spans
            .iter()
            .find(|s| s.class == HighlightClass::Keyword)
            .unwrap();
        assert_eq!(kw.text, "return");
    }

    #[test]
    fn selection_overrides_syntax_class() {
        let mut b = buffer_from(&["return x;"]);
        b.cursor_col = 1;
        b.begin_selection_if_needed();
        b.cursor_col = 7;
        b.update_selection();
        let rows = visible_rows(&b, &c_syntax(), &TextArea::new(0, 1, 40));
        let sel: String = rows[0]
            .spans
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(sel, "return");
    }

    #[test]
    fn block_comment_above_viewport_carries_into_visible_rows() {
        let b = {
            let mut b = buffer_from(&["/* opened here", "int inside;", "closed */ int after;"]);
            b.first_visible = b.document.line_id_at(2);
            b
        };
        let rows = visible_rows(&b, &c_syntax(), &TextArea::new(0, 2, 40));
        assert!(
            rows[0]
                .spans
                .iter()
                .all(|s| s.class == HighlightClass::Comment),
            "line inside an open comment must render as comment"
        );
        assert!(
            rows[1]
                .spans
                .iter()
                .any(|s| s.class == HighlightClass::Keyword)
        );
    }

    #[test]
    fn horizontal_clipping_respects_scroll_offset() {
        let mut b = buffer_from(&["abcdefghij"]);
        b.horizontal_scroll_offset = 3;
        let rows = visible_rows(&b, &c_syntax(), &TextArea::new(0, 1, 4));
        assert_eq!(row_text(&rows[0]), "cdef");
    }

    #[test]
    fn fully_scrolled_out_line_renders_empty() {
        let mut b = buffer_from(&["ab", "abcdefgh"]);
        b.horizontal_scroll_offset = 5;
        let rows = visible_rows(&b, &c_syntax(), &TextArea::new(0, 2, 4));
        assert!(rows[0].spans.is_empty());
        assert_eq!(row_text(&rows[1]), "efgh");
    }

    #[test]
    fn gutter_width_tracks_line_count_digits() {
        let cfg = Config::default();
        assert_eq!(gutter_width(&cfg, 9), 2);
        assert_eq!(gutter_width(&cfg, 10), 3);
        assert_eq!(gutter_width(&cfg, 4321), 5);
        let mut off = cfg;
        off.show_line_numbers = false;
        assert_eq!(gutter_width(&off, 4321), 0);
    }

    #[test]
    fn cursor_position_accounts_for_gutter_and_scroll() {
        let mut b = buffer_from(&["some text on a line"]);
        let area = TextArea::new(1, 5, 10);
        b.cursor_col = 4;
        b.update_scroll(&area);
        let (x, y) = cursor_screen_position(&b, &Config::default());
        assert_eq!(x, 2 + (4 - 1));
        assert_eq!(y, 1);
    }

    #[test]
    fn scroll_ratios_span_zero_to_one() {
        let lines: Vec<String> = (1..=30).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let mut b = buffer_from(&refs);
        let area = TextArea::new(0, 10, 40);
        assert_eq!(vertical_scroll_ratio(&b, area.height), 0.0);
        b.go_to_line(30);
        b.update_scroll(&area);
        assert_eq!(vertical_scroll_ratio(&b, area.height), 1.0);

        let mut short = buffer_from(&["a", "b"]);
        short.update_scroll(&area);
        assert_eq!(vertical_scroll_ratio(&short, area.height), 0.0);
    }

    #[test]
    fn horizontal_ratio_tracks_offset() {
        let long = "x".repeat(50);
        let mut b = buffer_from(&[long.as_str()]);
        assert_eq!(horizontal_scroll_ratio(&b, 10), 0.0);
        b.cursor_col = 51;
        b.update_scroll(&TextArea::new(0, 5, 10));
        assert_eq!(horizontal_scroll_ratio(&b, 10), 1.0);
    }
}
