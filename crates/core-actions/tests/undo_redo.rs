//! Undo granularity across the editing operations: one user action is
//! one undo step, whatever its size.

mod common;

use common::{area, buffer_from, cfg, place_cursor, texts};
use core_actions::{edit, replace_all};

#[test]
fn each_typed_character_is_one_undo_step() {
    let mut b = buffer_from(&[""]);
    for c in "abc".chars() {
        edit::type_char(&mut b, &cfg(), &area(), c);
    }
    assert_eq!(b.undo_depth(), 3);
    assert!(b.undo(&area()));
    assert_eq!(b.current_text(), "ab");
    assert!(b.undo(&area()));
    assert_eq!(b.current_text(), "a");
}

#[test]
fn selection_replacing_keystroke_undoes_in_one_step() {
    let mut b = buffer_from(&["hello world"]);
    place_cursor(&mut b, 1, 1);
    b.begin_selection_if_needed();
    b.cursor_col = 6;
    b.update_selection();
    edit::type_char(&mut b, &cfg(), &area(), 'X');
    assert_eq!(b.current_text(), "X world");
    assert!(b.undo(&area()));
    assert_eq!(b.current_text(), "hello world");
    assert_eq!(b.undo_depth(), 0);
}

#[test]
fn multi_line_paste_undoes_in_one_step() {
    let mut b = buffer_from(&["line"]);
    b.move_end();
    edit::paste(&mut b, &area(), "one\ntwo\nthree");
    assert_eq!(b.document.total_lines(), 3);
    assert!(b.undo(&area()));
    assert_eq!(texts(&b), ["line"]);
    assert!(b.redo(&area()));
    assert_eq!(texts(&b), ["lineone", "two", "three"]);
}

#[test]
fn cut_undoes_to_the_original_text() {
    let mut b = buffer_from(&["keep cut keep"]);
    place_cursor(&mut b, 1, 6);
    b.begin_selection_if_needed();
    b.cursor_col = 10;
    b.update_selection();
    let clip = edit::cut_selection(&mut b, &area());
    assert_eq!(clip.as_deref(), Some("cut "));
    assert_eq!(b.current_text(), "keep keep");
    assert!(b.undo(&area()));
    assert_eq!(b.current_text(), "keep cut keep");
}

#[test]
fn replace_all_sweep_is_one_undo_step() {
    let mut b = buffer_from(&["foo", "foo foo", "foo"]);
    assert_eq!(replace_all(&mut b, "foo", "bar", &area()), 4);
    assert_eq!(b.undo_depth(), 1);
    assert!(b.undo(&area()));
    assert_eq!(texts(&b), ["foo", "foo foo", "foo"]);
}

#[test]
fn line_join_undo_restores_both_lines() {
    let mut b = buffer_from(&["first", "second"]);
    place_cursor(&mut b, 2, 1);
    edit::backspace(&mut b, &area());
    assert_eq!(texts(&b), ["firstsecond"]);
    assert!(b.undo(&area()));
    assert_eq!(texts(&b), ["first", "second"]);
    assert_eq!((b.current_line_num, b.cursor_col), (2, 1));
    assert!(b.check_invariants());
}

#[test]
fn new_edit_after_undo_discards_redo() {
    let mut b = buffer_from(&[""]);
    edit::type_char(&mut b, &cfg(), &area(), 'a');
    edit::type_char(&mut b, &cfg(), &area(), 'b');
    b.undo(&area());
    assert_eq!(b.redo_depth(), 1);
    edit::type_char(&mut b, &cfg(), &area(), 'z');
    assert_eq!(b.redo_depth(), 0);
    assert_eq!(b.current_text(), "az");
}
