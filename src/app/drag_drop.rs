//! Tab drag and drop.
//!
//! A pane is drawn as a 2-row tab header above its content. While a tab is
//! dragged, the pointer position inside the hovered pane picks a drop zone:
//!
//! ```text
//!  ┌───────────────────────────┐
//!  │ tab bar (reorder/move)    │  rows 0..2
//!  ├──────┬─────────────┬──────┤
//!  │      │     top     │      │  y < h/4
//!  │ left ├─────────────┤right │
//!  │      │   center    │      │
//!  │ x<w/4├─────────────┤x>3w/4│
//!  │      │   bottom    │      │  y > 3h/4
//!  └──────┴─────────────┴──────┘
//! ```
//!
//! Left/right take precedence over top/bottom. Comparisons are strict, so a
//! pointer exactly on a quarter line is not in the margin.

use crate::app::types::{DropZone, TabDragState, TabDrop};
use crate::model::event::{PaneId, ViewId};
use crate::view::pane::Pane;
use ratatui::layout::Rect;

/// Rows occupied by the tab header at the top of every pane
pub const TAB_HEADER_ROWS: u16 = 2;

/// Classify a screen position over `pane` (drawn in `pane_rect`).
/// Returns `None` when the position is outside the pane.
pub fn classify_drop(pane: &Pane, pane_rect: Rect, col: u16, row: u16) -> Option<DropZone> {
    if col < pane_rect.x
        || row < pane_rect.y
        || col >= pane_rect.x + pane_rect.width
        || row >= pane_rect.y + pane_rect.height
    {
        return None;
    }
    let id = pane.id();
    let x = u32::from(col - pane_rect.x);
    let y_raw = row - pane_rect.y;
    if y_raw < TAB_HEADER_ROWS {
        return Some(DropZone::TabBar {
            pane: id,
            index: pane.insertion_index_at(col - pane_rect.x),
        });
    }

    let w = u32::from(pane_rect.width);
    let h = u32::from(pane_rect.height.saturating_sub(TAB_HEADER_ROWS));
    let y = u32::from(y_raw - TAB_HEADER_ROWS);
    let zone = if 4 * x < w {
        DropZone::SplitLeft(id)
    } else if 4 * x > 3 * w {
        DropZone::SplitRight(id)
    } else if 4 * y < h {
        DropZone::SplitTop(id)
    } else if 4 * y > 3 * h {
        DropZone::SplitBottom(id)
    } else {
        DropZone::Center(id)
    };
    Some(zone)
}

/// Preview rectangle for a margin zone over `pane_rect`; `None` for the tab
/// bar and center, which get no preview.
pub fn overlay_rect(zone: DropZone, pane_rect: Rect) -> Option<Rect> {
    let w = pane_rect.width;
    let h = pane_rect.height.saturating_sub(TAB_HEADER_ROWS);
    let x = pane_rect.x;
    let y = pane_rect.y + TAB_HEADER_ROWS.min(pane_rect.height);
    let rect = match zone {
        DropZone::SplitLeft(_) => Rect::new(x, y, w / 4, h),
        DropZone::SplitRight(_) => Rect::new(x + w - w / 4, y, w / 4, h),
        DropZone::SplitTop(_) => Rect::new(x, y, w, h / 4),
        DropZone::SplitBottom(_) => Rect::new(x, y + h - h / 4, w, h / 4),
        DropZone::TabBar { .. } | DropZone::Center(_) => return None,
    };
    Some(rect)
}

/// Tracks the gesture from press to release
#[derive(Debug, Default)]
pub struct DragDropController {
    state: Option<TabDragState>,
}

impl DragDropController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button pressed on a tab
    pub fn begin(&mut self, view_id: ViewId, source_pane: PaneId, position: (u16, u16)) {
        self.state = Some(TabDragState::new(view_id, source_pane, position));
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// True once the pointer has moved since the press
    pub fn is_dragging(&self) -> bool {
        self.state.as_ref().is_some_and(TabDragState::is_dragging)
    }

    pub fn state(&self) -> Option<&TabDragState> {
        self.state.as_ref()
    }

    /// Current preview rectangle, if any
    pub fn overlay(&self) -> Option<Rect> {
        self.state.as_ref().and_then(|s| s.overlay)
    }

    /// Pointer moved to `position`, hovering `target` (pane and its rectangle)
    pub fn drag_move(&mut self, position: (u16, u16), target: Option<(&Pane, Rect)>) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.current_position = position;
        if !state.is_dragging() {
            return;
        }
        state.drop_zone =
            target.and_then(|(pane, rect)| classify_drop(pane, rect, position.0, position.1));
        state.overlay = match (state.drop_zone, target) {
            (Some(zone), Some((_, rect))) => overlay_rect(zone, rect),
            _ => None,
        };
    }

    /// Pointer left every pane; hide the preview
    pub fn drag_leave(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.drop_zone = None;
            state.overlay = None;
        }
    }

    /// Button released. Returns the drop to perform, if the gesture was a
    /// real drag that ended over a zone.
    pub fn finish(&mut self) -> Option<TabDrop> {
        let state = self.state.take()?;
        if !state.is_dragging() {
            return None;
        }
        state.drop_zone.map(|zone| TabDrop {
            view_id: state.view_id,
            source_pane: state.source_pane,
            zone,
        })
    }

    pub fn cancel(&mut self) {
        self.state = None;
    }
}
