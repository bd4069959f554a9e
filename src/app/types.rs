use crate::model::event::{InsertSide, PaneId, SplitDirection, ViewId};
use ratatui::layout::Rect;

/// Where a dragged tab would land if released now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// Into a pane's tab strip, before the tab at `index` (or at the end)
    TabBar { pane: PaneId, index: usize },
    /// Create a new pane left of the target
    SplitLeft(PaneId),
    /// Create a new pane right of the target
    SplitRight(PaneId),
    /// Create a new pane above the target
    SplitTop(PaneId),
    /// Create a new pane below the target
    SplitBottom(PaneId),
    /// Into the center of a pane (appended to its tabs)
    Center(PaneId),
}

impl DropZone {
    /// The pane this drop zone is associated with
    pub fn pane_id(&self) -> PaneId {
        match self {
            Self::TabBar { pane, .. }
            | Self::SplitLeft(pane)
            | Self::SplitRight(pane)
            | Self::SplitTop(pane)
            | Self::SplitBottom(pane)
            | Self::Center(pane) => *pane,
        }
    }

    /// Direction and side of the new pane for margin zones
    pub fn split_placement(&self) -> Option<(SplitDirection, InsertSide)> {
        match self {
            Self::SplitLeft(_) => Some((SplitDirection::Horizontal, InsertSide::Before)),
            Self::SplitRight(_) => Some((SplitDirection::Horizontal, InsertSide::After)),
            Self::SplitTop(_) => Some((SplitDirection::Vertical, InsertSide::Before)),
            Self::SplitBottom(_) => Some((SplitDirection::Vertical, InsertSide::After)),
            Self::TabBar { .. } | Self::Center(_) => None,
        }
    }
}

/// State for a tab being dragged
#[derive(Debug, Clone)]
pub struct TabDragState {
    /// The view (tab) being dragged
    pub view_id: ViewId,
    /// The pane the tab was dragged from
    pub source_pane: PaneId,
    /// Mouse position when the button was pressed
    pub start_position: (u16, u16),
    /// Current mouse position
    pub current_position: (u16, u16),
    /// Currently detected drop zone (if any)
    pub drop_zone: Option<DropZone>,
    /// Preview rectangle for the current drop zone
    pub overlay: Option<Rect>,
}

impl TabDragState {
    pub fn new(view_id: ViewId, source_pane: PaneId, start_position: (u16, u16)) -> Self {
        Self {
            view_id,
            source_pane,
            start_position,
            current_position: start_position,
            drop_zone: None,
            overlay: None,
        }
    }

    /// A press only becomes a drag once the pointer leaves the press cell
    pub fn is_dragging(&self) -> bool {
        self.current_position != self.start_position
    }
}

/// A completed drag: move `view_id` from `source_pane` into `zone`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabDrop {
    pub view_id: ViewId,
    pub source_pane: PaneId,
    pub zone: DropZone,
}

/// Layout from the last render, used for mouse hit testing
#[derive(Debug, Clone, Default)]
pub struct CachedLayout {
    /// Area the panes are laid out in (window minus status line)
    pub editor_area: Rect,
    /// Each pane's full rectangle, header included
    pub pane_rects: Vec<(PaneId, Rect)>,
}

impl CachedLayout {
    /// Pane under a screen position
    pub fn pane_at(&self, col: u16, row: u16) -> Option<(PaneId, Rect)> {
        self.pane_rects.iter().copied().find(|(_, r)| {
            col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_without_movement_is_not_a_drag() {
        let mut state = TabDragState::new(ViewId(0), PaneId(0), (5, 0));
        assert!(!state.is_dragging());
        state.current_position = (6, 0);
        assert!(state.is_dragging());
    }

    #[test]
    fn test_split_placement() {
        let p = PaneId(1);
        assert_eq!(
            DropZone::SplitLeft(p).split_placement(),
            Some((SplitDirection::Horizontal, InsertSide::Before))
        );
        assert_eq!(
            DropZone::SplitBottom(p).split_placement(),
            Some((SplitDirection::Vertical, InsertSide::After))
        );
        assert_eq!(DropZone::Center(p).split_placement(), None);
        assert_eq!(DropZone::TabBar { pane: p, index: 0 }.pane_id(), p);
    }

    #[test]
    fn test_cached_layout_hit_test() {
        let layout = CachedLayout {
            editor_area: Rect::new(0, 0, 80, 23),
            pane_rects: vec![
                (PaneId(0), Rect::new(0, 0, 40, 23)),
                (PaneId(1), Rect::new(41, 0, 39, 23)),
            ],
        };
        assert_eq!(layout.pane_at(10, 10).map(|(p, _)| p), Some(PaneId(0)));
        assert_eq!(layout.pane_at(40, 10), None);
        assert_eq!(layout.pane_at(79, 22).map(|(p, _)| p), Some(PaneId(1)));
    }
}
