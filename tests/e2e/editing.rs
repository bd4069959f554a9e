use crate::common::harness::EditorTestHarness;
use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};
use kode::model::event::{PaneId, TextPosition};

fn numbered_lines(count: usize) -> String {
    (1..=count).map(|i| format!("line {i}\n")).collect()
}

#[test]
fn test_typing_updates_screen_and_status() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("notes.txt", "").unwrap();
    harness.open_file(&path).unwrap();

    harness.type_text("Hello").unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
    harness.type_text("World").unwrap();

    harness.assert_screen_contains("  1 Hello");
    harness.assert_screen_contains("  2 World");
    assert!(harness.get_status_bar().contains("notes.txt | Ln 2, Col 6"));
}

#[test]
fn test_shift_selection_is_highlighted() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("sel.txt", "abcdef\n").unwrap();
    harness.open_file(&path).unwrap();

    for _ in 0..3 {
        harness.send_key(KeyCode::Right, KeyModifiers::SHIFT).unwrap();
    }
    let theme = harness.editor().theme().clone();
    // text starts after the 4-column gutter on row 2
    for x in 4..7 {
        assert_eq!(harness.get_cell_style(x, 2).unwrap().bg, Some(theme.selection_bg));
    }
    assert_ne!(harness.get_cell_style(7, 2).unwrap().bg, Some(theme.selection_bg));

    // typing replaces the selection
    harness.type_text("X").unwrap();
    harness.assert_screen_contains("  1 Xdef");
}

#[test]
fn test_click_places_cursor() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("click.txt", "first\nsecond\nthird\n").unwrap();
    let view = harness.open_file(&path).unwrap();

    // row 3 is the second line, column 4 is the first text column
    harness.mouse_click(4 + 3, 3).unwrap();
    let cursor = harness.editor().workspace().view(view).unwrap().cursor();
    assert_eq!(cursor, TextPosition::new(1, 3));

    // clicking past the end of a line clamps to its end
    harness.mouse_click(70, 4).unwrap();
    let cursor = harness.editor().workspace().view(view).unwrap().cursor();
    assert_eq!(cursor, TextPosition::new(2, 5));
}

#[test]
fn test_scroll_wheel_scrolls_view() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("long.txt", &numbered_lines(100)).unwrap();
    let view = harness.open_file(&path).unwrap();

    harness
        .send_mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 10,
            row: 10,
            modifiers: KeyModifiers::empty(),
        })
        .unwrap();
    harness.render().unwrap();

    let scroll = harness.editor().config().editor.mouse_scroll_lines;
    assert_eq!(
        harness.editor().workspace().view(view).unwrap().top_line(),
        scroll
    );
    let first_row = harness.get_row_text(2);
    let expected = format!("{:>3} line {}", scroll + 1, scroll + 1);
    assert!(first_row.starts_with(&expected), "row 2: {first_row}");
}

#[test]
fn test_cursor_movement_scrolls_into_view() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("long.txt", &numbered_lines(100)).unwrap();
    let view = harness.open_file(&path).unwrap();

    // 24 rows minus the status line and the tab header
    let visible = 21;
    for _ in 0..visible {
        harness.send_key(KeyCode::Down, KeyModifiers::NONE).unwrap();
    }
    assert_eq!(
        harness.editor().workspace().view(view).unwrap().top_line(),
        1
    );
    harness.assert_screen_contains(" 22 line 22");
}

#[test]
fn test_pane_focus_keys_and_quit() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let a = harness.create_file("a.rs", "a\n").unwrap();
    let b = harness.create_file("b.rs", "b\n").unwrap();
    harness.open_file(&a).unwrap();
    harness.open_file(&b).unwrap();
    harness.mouse_drag(9, 0, 75, 12).unwrap();
    let right = harness.editor().workspace().active_pane();
    assert_ne!(right, PaneId(0));

    harness
        .send_key(KeyCode::Char('n'), KeyModifiers::CONTROL)
        .unwrap();
    assert_eq!(harness.editor().workspace().active_pane(), PaneId(0));
    harness
        .send_key(KeyCode::Char('p'), KeyModifiers::CONTROL)
        .unwrap();
    assert_eq!(harness.editor().workspace().active_pane(), right);

    // new files open in the last focused pane
    let c = harness.create_file("c.rs", "c\n").unwrap();
    harness.open_file(&c).unwrap();
    let labels: Vec<String> = harness
        .editor()
        .workspace()
        .pane(right)
        .unwrap()
        .tabs()
        .iter()
        .map(|t| t.label.clone())
        .collect();
    assert_eq!(labels, vec!["b.rs", "c.rs"]);

    assert!(!harness.should_quit());
    harness
        .send_key(KeyCode::Char('q'), KeyModifiers::CONTROL)
        .unwrap();
    assert!(harness.should_quit());
}
