use super::*;
use crossterm::event::{KeyCode, KeyModifiers};

impl Editor {
    /// Handle a key event. This is the central key handling logic used by
    /// both main.rs and tests.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> AnyhowResult<()> {
        tracing::trace!(
            "Editor.handle_key: code={:?}, modifiers={:?}",
            code,
            modifiers
        );

        if code == KeyCode::Esc && self.drag.is_active() {
            self.drag.cancel();
            return Ok(());
        }

        if modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_control_key(code);
            return Ok(());
        }

        let extend = modifiers.contains(KeyModifiers::SHIFT);
        let now = self.time_source.now();
        let (height, width) = self.active_content_size();
        let indent = " ".repeat(self.config.editor.tab_size);
        let Some(view) = self.workspace.active_view_mut() else {
            return Ok(());
        };

        match code {
            KeyCode::Char(c) => {
                let mut buf = [0u8; 4];
                view.insert_text(c.encode_utf8(&mut buf), now);
            }
            KeyCode::Tab => view.insert_text(&indent, now),
            KeyCode::Enter => view.insert_newline(now),
            KeyCode::Backspace => view.backspace(now),
            KeyCode::Delete => view.delete_forward(now),
            KeyCode::Left => view.move_left(extend),
            KeyCode::Right => view.move_right(extend),
            KeyCode::Up => view.move_up(extend),
            KeyCode::Down => view.move_down(extend),
            KeyCode::Home => view.move_line_start(extend),
            KeyCode::End => view.move_line_end(extend),
            KeyCode::Esc => view.clear_selection(),
            _ => return Ok(()),
        }
        view.ensure_cursor_visible(height, width);
        Ok(())
    }

    fn handle_control_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('w') => {
                if let Err(e) = self.workspace.close_current_tab() {
                    tracing::debug!("close tab refused: {}", e);
                }
            }
            KeyCode::Char('n') => self.workspace.focus_next_pane(),
            KeyCode::Char('p') => self.workspace.focus_prev_pane(),
            KeyCode::Left | KeyCode::Right => {
                let delta = if code == KeyCode::Left { -1 } else { 1 };
                let pane = self.workspace.active_pane();
                if let Some(pane) = self.workspace.pane_mut(pane) {
                    pane.cycle(delta);
                }
            }
            _ => {}
        }
    }
}
