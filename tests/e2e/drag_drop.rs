use crate::common::harness::EditorTestHarness;
use kode::model::event::{PaneId, SplitDirection};

fn labels(harness: &EditorTestHarness, pane: PaneId) -> Vec<String> {
    harness
        .editor()
        .workspace()
        .pane(pane)
        .unwrap()
        .tabs()
        .iter()
        .map(|t| t.label.clone())
        .collect()
}

/// Harness with the given files open, in order, in the first pane
fn harness_with(names: &[&str]) -> EditorTestHarness {
    let mut harness = EditorTestHarness::new(80, 24).unwrap();
    for name in names {
        let path = harness
            .create_file(name, &format!("contents of {name}\n"))
            .unwrap();
        harness.open_file(&path).unwrap();
    }
    harness
}

/// Dragging a tab onto the left margin creates a new pane left of the target
#[test]
fn test_drag_tab_to_left_margin_splits() {
    let mut harness = harness_with(&["a.py", "b.py"]);
    harness.assert_screen_contains(" a.py   b.py ");

    // b.py's label spans columns 7..13; the left quarter of 80 columns ends at 20
    harness.mouse_drag(9, 0, 5, 12).unwrap();

    let workspace = harness.editor().workspace();
    assert_eq!(workspace.pane_count(), 2);
    let new_pane = workspace.active_pane();
    assert_eq!(workspace.layout().pane_ids(), vec![new_pane, PaneId(0)]);
    assert_eq!(
        workspace.layout().root().direction(),
        Some(SplitDirection::Horizontal)
    );
    assert_eq!(labels(&harness, new_pane), vec!["b.py"]);
    assert_eq!(labels(&harness, PaneId(0)), vec!["a.py"]);

    // 79 usable columns: 40 for the new pane, a separator, 39 for the old one
    let left = harness.pane_rect(new_pane).unwrap();
    let right = harness.pane_rect(PaneId(0)).unwrap();
    assert_eq!((left.x, left.width), (0, 40));
    assert_eq!((right.x, right.width), (41, 39));

    let top_row = harness.get_row_text(0);
    assert!(top_row.starts_with(" b.py "), "row 0: {top_row}");
    let right_half: String = top_row.chars().skip(41).collect();
    assert!(right_half.starts_with(" a.py "), "row 0: {top_row}");
    assert_eq!(harness.get_row_text(10).chars().nth(40), Some('│'));
    harness.assert_screen_contains("contents of b.py");
    harness.assert_screen_contains("contents of a.py");
}

/// The preview rectangle follows the pointer and disappears on release
#[test]
fn test_drop_overlay_shown_while_dragging() {
    let mut harness = harness_with(&["a.rs", "b.rs"]);

    harness.mouse_drag_hold(9, 0, 5, 12).unwrap();
    assert!(harness.editor().drag().is_dragging());
    let theme = harness.editor().theme().clone();

    // Left zone of the single pane: x 0..20, rows 2..23
    assert_eq!(harness.get_row_text(2).chars().next(), Some('┌'));
    let border = harness.get_cell_style(0, 2).unwrap();
    assert_eq!(border.fg, Some(theme.drop_overlay_fg));
    let inside = harness.get_cell_style(10, 10).unwrap();
    assert_eq!(inside.bg, Some(theme.drop_overlay_fill));
    let outside = harness.get_cell_style(50, 10).unwrap();
    assert_ne!(outside.bg, Some(theme.drop_overlay_fill));

    // Move to the center: no preview
    harness.mouse_drag_to(40, 12).unwrap();
    assert!(harness.editor().drag().is_dragging());
    assert!(harness.editor().drag().overlay().is_none());
    let center = harness.get_cell_style(10, 10).unwrap();
    assert_ne!(center.bg, Some(theme.drop_overlay_fill));
}

/// Moving a tab into another pane's tab strip, then emptying a pane
#[test]
fn test_move_tab_between_panes_and_collapse() {
    let mut harness = harness_with(&["a.rs", "b.rs", "c.rs"]);

    // c.rs (columns 14..20) to the right margin
    harness.mouse_drag(16, 0, 70, 12).unwrap();
    let right = harness.editor().workspace().active_pane();
    assert_eq!(
        harness.editor().workspace().layout().pane_ids(),
        vec![PaneId(0), right]
    );
    let right_x = harness.pane_rect(right).unwrap().x;

    // b.rs onto the first tab of the right pane: inserted before c.rs
    harness.mouse_drag(9, 0, right_x + 1, 0).unwrap();
    assert_eq!(labels(&harness, right), vec!["b.rs", "c.rs"]);
    assert_eq!(labels(&harness, PaneId(0)), vec!["a.rs"]);
    assert_eq!(harness.editor().workspace().active_pane(), right);

    // a.rs into the center of the right pane: the left pane is removed
    harness.mouse_drag(2, 0, right_x + 20, 12).unwrap();
    let workspace = harness.editor().workspace();
    assert_eq!(workspace.pane_count(), 1);
    assert!(workspace.pane(PaneId(0)).is_none());
    assert!(workspace.layout().validate().is_ok());
    assert_eq!(labels(&harness, right), vec!["b.rs", "c.rs", "a.rs"]);

    let rect = harness.pane_rect(right).unwrap();
    assert_eq!((rect.x, rect.width), (0, 80));
}

/// A click that never moves selects the tab without moving it
#[test]
fn test_click_on_tab_selects_without_dragging() {
    let mut harness = harness_with(&["a.rs", "b.rs"]);
    harness.mouse_click(2, 0).unwrap();

    let workspace = harness.editor().workspace();
    assert_eq!(workspace.pane_count(), 1);
    assert_eq!(labels(&harness, PaneId(0)), vec!["a.rs", "b.rs"]);
    assert_eq!(
        workspace.pane(PaneId(0)).unwrap().current_index(),
        Some(0)
    );
    assert!(!harness.editor().drag().is_active());
    harness.assert_screen_contains("contents of a.rs");
}

/// Dropping the only tab of a pane beside itself changes nothing
#[test]
fn test_only_tab_dropped_on_own_margin_is_ignored() {
    let mut harness = harness_with(&["a.rs"]);
    let before = harness.editor().workspace().layout().root().clone();

    harness.mouse_drag(2, 0, 75, 12).unwrap();
    assert_eq!(harness.editor().workspace().layout().root(), &before);
    assert_eq!(labels(&harness, PaneId(0)), vec!["a.rs"]);
}
