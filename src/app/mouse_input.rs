use super::*;
use crate::app::drag_drop::TAB_HEADER_ROWS;
use crate::model::event::{PaneId, TextPosition};
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

impl Editor {
    /// Handle a mouse event. Returns true if a re-render is needed.
    pub fn handle_mouse(&mut self, mouse_event: MouseEvent) -> AnyhowResult<bool> {
        let col = mouse_event.column;
        let row = mouse_event.row;

        tracing::trace!(
            "handle_mouse: kind={:?}, col={}, row={}",
            mouse_event.kind,
            col,
            row
        );

        let needs_render = match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_mouse_click(col, row, mouse_event.modifiers);
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => self.handle_mouse_drag(col, row),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drop) = self.drag.finish() {
                    if let Err(e) = self.workspace.execute_tab_drop(drop) {
                        tracing::warn!("tab drop refused: {}", e);
                        self.status_message = Some(e.to_string());
                    }
                }
                true
            }
            MouseEventKind::ScrollUp => self.handle_mouse_scroll(col, row, -1),
            MouseEventKind::ScrollDown => self.handle_mouse_scroll(col, row, 1),
            _ => false,
        };
        Ok(needs_render)
    }

    fn handle_mouse_click(&mut self, col: u16, row: u16, modifiers: KeyModifiers) {
        // A stray press without a release ends any previous gesture
        self.drag.cancel();

        let Some((pane_id, rect)) = self.cached_layout.pane_at(col, row) else {
            return;
        };

        if row - rect.y < TAB_HEADER_ROWS {
            let hit = self.workspace.pane(pane_id).and_then(|pane| {
                let index = pane.tab_at_column(col - rect.x)?;
                Some((index, pane.tabs()[index].view_id))
            });
            match hit {
                Some((index, view_id)) => {
                    if let Err(e) = self.workspace.select_tab(pane_id, index) {
                        tracing::warn!("select tab failed: {}", e);
                        return;
                    }
                    self.drag.begin(view_id, pane_id, (col, row));
                }
                None => {
                    self.workspace.focus_changed(pane_id);
                }
            }
            return;
        }

        self.workspace.focus_changed(pane_id);
        let extend = modifiers.contains(KeyModifiers::SHIFT);
        if let Some(pos) = self.text_position_at(pane_id, rect, col, row) {
            if let Some(view) = self.workspace.active_view_mut() {
                view.set_cursor(pos, extend);
            }
        }
    }

    fn handle_mouse_drag(&mut self, col: u16, row: u16) -> bool {
        if self.drag.is_active() {
            let target = self
                .cached_layout
                .pane_at(col, row)
                .and_then(|(id, rect)| self.workspace.pane(id).map(|pane| (pane, rect)));
            if target.is_none() {
                self.drag.drag_leave();
            }
            self.drag.drag_move((col, row), target);
            return true;
        }

        // Dragging in the focused pane's content extends the selection
        let pane_id = self.workspace.active_pane();
        let Some((hovered, rect)) = self.cached_layout.pane_at(col, row) else {
            return false;
        };
        if hovered != pane_id {
            return false;
        }
        match self.text_position_at(pane_id, rect, col, row) {
            Some(pos) => {
                if let Some(view) = self.workspace.active_view_mut() {
                    view.set_cursor(pos, true);
                }
                true
            }
            None => false,
        }
    }

    fn handle_mouse_scroll(&mut self, col: u16, row: u16, direction: isize) -> bool {
        let Some((pane_id, _)) = self.cached_layout.pane_at(col, row) else {
            return false;
        };
        let Some(view_id) = self.workspace.pane(pane_id).and_then(|p| p.current_view()) else {
            return false;
        };
        let lines = self.config.editor.mouse_scroll_lines as isize;
        match self.workspace.view_mut(view_id) {
            Some(view) => {
                view.scroll_by(direction * lines);
                true
            }
            None => false,
        }
    }

    /// Document position under a screen cell in the content area of a pane
    fn text_position_at(
        &self,
        pane_id: PaneId,
        rect: Rect,
        col: u16,
        row: u16,
    ) -> Option<TextPosition> {
        let view_id = self.workspace.pane(pane_id)?.current_view()?;
        let view = self.workspace.view(view_id)?;
        let content_row = row.checked_sub(rect.y + TAB_HEADER_ROWS)?;
        let gutter = self.gutter_width(view.document().line_count());
        let content_col = col.saturating_sub(rect.x + gutter);
        Some(TextPosition::new(
            view.top_line() + usize::from(content_row),
            view.left_column() + usize::from(content_col),
        ))
    }
}
