use crate::common::harness::EditorTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;

const PYTHON_SOURCE: &str = "def main():\n    return 0\n";

/// Row and column where content text starts in a single full-width pane
/// (below the tab header, after a 4-column gutter)
const CONTENT_ROW: u16 = 2;
const TEXT_COL: u16 = 4;

/// Editing one view of a shared file re-highlights what the other view shows
#[test]
fn test_edit_in_one_view_highlights_in_the_other() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("a.py", PYTHON_SOURCE).unwrap();
    let first = harness.open_file(&path).unwrap();
    let second = harness.open_file(&path).unwrap();

    let workspace = harness.editor().workspace();
    let document = workspace.view(first).unwrap().document().clone();
    assert!(std::sync::Arc::ptr_eq(
        &document,
        workspace.view(second).unwrap().document()
    ));
    assert_eq!(workspace.store().len(), 1);

    // Edit through the first tab
    harness.mouse_click(2, 0).unwrap();
    harness.type_text("x=1").unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    // Back to the second tab; nothing highlighted yet
    harness.mouse_click(9, 0).unwrap();
    harness.assert_screen_contains("  1 x=1");
    let theme = harness.editor().theme().clone();
    let def_style = harness.get_cell_style(TEXT_COL, CONTENT_ROW + 1).unwrap();
    assert_eq!(def_style.fg, Some(theme.editor_fg));
    assert_eq!(document.highlight_generation(), 0);

    harness.advance_time(Duration::from_millis(500)).unwrap();

    assert_eq!(document.highlight_generation(), 1);
    let styled = document.styled_snapshot();
    assert!(styled.len() >= document.line_count());
    assert!(styled[0].matches("x=1"));
    assert!(styled[0].is_highlighted());

    harness.assert_screen_contains("  1 x=1");
    let def_style = harness.get_cell_style(TEXT_COL, CONTENT_ROW + 1).unwrap();
    assert_eq!(def_style.fg, Some(theme.syntax_keyword));
    assert!(harness.get_status_bar().contains("Python"));
}

/// A burst of edits inside the debounce window produces one highlight pass
#[test]
fn test_edit_burst_coalesces_into_one_pass() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("main.rs", "fn main() {}\n").unwrap();
    let view = harness.open_file(&path).unwrap();
    let document = harness
        .editor()
        .workspace()
        .view(view)
        .unwrap()
        .document()
        .clone();

    for ch in ['a', 'b', 'c'] {
        harness.type_text(&ch.to_string()).unwrap();
        harness.advance_time(Duration::from_millis(200)).unwrap();
        assert_eq!(document.highlight_generation(), 0);
    }

    // 500ms after the last keystroke, minus one
    harness.advance_time(Duration::from_millis(299)).unwrap();
    assert_eq!(document.highlight_generation(), 0);

    harness.advance_time(Duration::from_millis(1)).unwrap();
    assert_eq!(document.highlight_generation(), 1);

    harness.advance_time(Duration::from_secs(5)).unwrap();
    assert_eq!(document.highlight_generation(), 1);
}

/// A freshly opened file gets its first highlight after the initial delay
#[test]
fn test_initial_highlight_after_open() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("main.rs", "fn main() {}\n").unwrap();
    harness.open_file(&path).unwrap();
    let theme = harness.editor().theme().clone();

    harness.advance_time(Duration::from_millis(299)).unwrap();
    let fn_style = harness.get_cell_style(TEXT_COL, CONTENT_ROW).unwrap();
    assert_eq!(fn_style.fg, Some(theme.editor_fg));

    harness.advance_time(Duration::from_millis(1)).unwrap();
    let fn_style = harness.get_cell_style(TEXT_COL, CONTENT_ROW).unwrap();
    assert_eq!(fn_style.fg, Some(theme.syntax_keyword));
    assert!(harness.get_status_bar().contains("Rust"));
}

/// Files without a known grammar render as plain text
#[test]
fn test_unknown_grammar_stays_plain() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("notes.txt", "fn main() {}\n").unwrap();
    harness.open_file(&path).unwrap();
    harness.advance_time(Duration::from_millis(300)).unwrap();

    let theme = harness.editor().theme().clone();
    let style = harness.get_cell_style(TEXT_COL, CONTENT_ROW).unwrap();
    assert_eq!(style.fg, Some(theme.editor_fg));
    harness.assert_screen_contains("fn main() {}");
}
