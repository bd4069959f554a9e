use crate::common::harness::EditorTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use kode::model::event::PaneId;

/// Edits through one view show up in another view of the same file
#[test]
fn test_two_views_share_text() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("shared.txt", "hello\n").unwrap();
    harness.open_file(&path).unwrap();
    harness.open_file(&path).unwrap();

    // second tab is current; split it off to the right so both are visible
    harness.mouse_drag(15, 0, 75, 12).unwrap();
    assert_eq!(harness.editor().workspace().pane_count(), 2);

    harness.send_key(KeyCode::End, KeyModifiers::NONE).unwrap();
    harness.type_text(" world").unwrap();

    let left = harness.get_row_text(2);
    let right: String = harness.get_row_text(2).chars().skip(41).collect();
    assert!(left.starts_with("  1 hello world"), "left: {left}");
    assert!(right.starts_with("  1 hello world"), "right: {right}");
}

/// Closing the last tab of a file evicts its document
#[test]
fn test_close_tabs_releases_document() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("a.rs", "fn a() {}\n").unwrap();
    harness.open_file(&path).unwrap();
    harness.open_file(&path).unwrap();
    assert_eq!(harness.editor().workspace().store().len(), 1);

    harness
        .send_key(KeyCode::Char('w'), KeyModifiers::CONTROL)
        .unwrap();
    assert_eq!(harness.editor().workspace().store().len(), 1);
    harness
        .send_key(KeyCode::Char('w'), KeyModifiers::CONTROL)
        .unwrap();
    assert!(harness.editor().workspace().store().is_empty());

    // the last pane stays, empty
    assert_eq!(harness.editor().workspace().pane_count(), 1);
    assert!(harness.get_status_bar().contains("[No file]"));
}

/// A file that cannot be read opens no tab and reports the failure
#[test]
fn test_open_missing_file_reports_error() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let path = harness.create_file("exists.txt", "x").unwrap();
    let missing = path.with_file_name("missing.txt");

    assert!(harness.open_file(&missing).is_err());
    harness.render().unwrap();

    let workspace = harness.editor().workspace();
    assert!(workspace.pane(PaneId(0)).unwrap().is_empty());
    assert!(workspace.store().is_empty());
    assert!(harness.get_status_bar().contains("missing.txt"));
}

/// Closing a pane's only tab removes the pane
#[test]
fn test_closing_only_tab_removes_pane() {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    let a = harness.create_file("a.rs", "a\n").unwrap();
    let b = harness.create_file("b.rs", "b\n").unwrap();
    harness.open_file(&a).unwrap();
    harness.open_file(&b).unwrap();
    harness.mouse_drag(9, 0, 5, 12).unwrap();
    assert_eq!(harness.editor().workspace().pane_count(), 2);

    // the new pane (holding b.rs) has focus
    harness
        .send_key(KeyCode::Char('w'), KeyModifiers::CONTROL)
        .unwrap();
    let workspace = harness.editor().workspace();
    assert_eq!(workspace.pane_count(), 1);
    assert_eq!(workspace.active_pane(), PaneId(0));
    harness.assert_screen_contains(" a.rs ");
    harness.assert_screen_not_contains(" b.rs ");
}
