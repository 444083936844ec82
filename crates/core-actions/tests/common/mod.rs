//! Shared fixtures for the action integration tests.
#![allow(dead_code)]

use core_config::Config;
use core_document::Document;
use core_state::{EditorBuffer, TextArea};

/// Route `RUST_LOG`-filtered events into the test harness output.
/// Safe to call from every test; only the first call installs.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn buffer_from(lines: &[&str]) -> EditorBuffer {
    init_tracing();
    let mut b = EditorBuffer::untitled("test.c");
    b.document = Document::from_lines(lines.iter().map(|s| s.to_string()).collect());
    b.current_line = b.document.head();
    b.first_visible = b.document.head();
    b
}

pub fn area() -> TextArea {
    TextArea::new(2, 10, 40)
}

pub fn cfg() -> Config {
    Config::default()
}

/// Every line's text, for whole-buffer assertions.
pub fn texts(b: &EditorBuffer) -> Vec<String> {
    b.document.snapshot_texts()
}

/// Place the cursor at a 1-based (line, column) position.
pub fn place_cursor(b: &mut EditorBuffer, line: usize, col: usize) {
    b.go_to_line(line);
    b.cursor_col = col;
    b.clamp_cursor_col();
}
