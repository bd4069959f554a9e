// EditorTestHarness - Virtual terminal environment for E2E testing

use anyhow::Result as AnyhowResult;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use kode::app::Editor;
use kode::config::Config;
use kode::model::event::{PaneId, ViewId};
use kode::services::time_source::TestTimeSource;
use ratatui::layout::Rect;
use ratatui::{backend::TestBackend, Terminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Terminal layout constants
pub mod layout {
    /// Tab labels are on the first row of every pane
    pub const TAB_BAR_ROW: u16 = 0;

    /// Content starts below the tab labels and the rule
    pub const CONTENT_START_ROW: u16 = 2;

    /// Get the status bar row for a given terminal height
    #[inline]
    pub const fn status_bar_row(terminal_height: u16) -> u16 {
        terminal_height - 1
    }
}

pub struct EditorTestHarness {
    /// The editor instance
    editor: Editor,

    /// Virtual terminal backend
    terminal: Terminal<TestBackend>,

    /// Synthetic clock shared with the editor and its documents
    clock: Arc<TestTimeSource>,

    /// Scratch directory for test files (kept alive for the duration of the test)
    temp_dir: TempDir,
}

impl EditorTestHarness {
    /// Create new test harness with virtual terminal.
    /// Highlight passes run inline so tests see them deterministically.
    pub fn new(width: u16, height: u16) -> AnyhowResult<Self> {
        let mut config = Config::default();
        config.editor.background_highlighting = false;
        Self::with_config(width, height, config)
    }

    /// Create with custom config
    pub fn with_config(width: u16, height: u16, config: Config) -> AnyhowResult<Self> {
        let temp_dir = TempDir::new()?;
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        let clock = TestTimeSource::shared();
        let editor = Editor::with_time_source(config, width, height, clock.clone())?;

        Ok(EditorTestHarness {
            editor,
            terminal,
            clock,
            temp_dir,
        })
    }

    /// Write a file into the harness's scratch directory
    pub fn create_file(&self, name: &str, contents: &str) -> AnyhowResult<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Open a file in the last focused pane and render
    pub fn open_file(&mut self, path: &Path) -> AnyhowResult<ViewId> {
        let view = self.editor.open_file(path)?;
        self.render()?;
        Ok(view)
    }

    /// Simulate a key press
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> AnyhowResult<()> {
        self.editor.handle_key(code, modifiers)?;
        self.tick();
        self.render()
    }

    /// Simulate typing a string of text.
    /// Only renders once at the end.
    pub fn type_text(&mut self, text: &str) -> AnyhowResult<()> {
        for ch in text.chars() {
            self.editor.handle_key(KeyCode::Char(ch), KeyModifiers::NONE)?;
        }
        self.tick();
        self.render()
    }

    /// Simulate a mouse event
    pub fn send_mouse(&mut self, mouse_event: MouseEvent) -> AnyhowResult<()> {
        self.editor.handle_mouse(mouse_event)?;
        Ok(())
    }

    fn mouse(&mut self, kind: MouseEventKind, col: u16, row: u16) -> AnyhowResult<()> {
        self.send_mouse(MouseEvent {
            kind,
            column: col,
            row,
            modifiers: KeyModifiers::empty(),
        })
    }

    /// Simulate a mouse click at specific coordinates
    pub fn mouse_click(&mut self, col: u16, row: u16) -> AnyhowResult<()> {
        self.mouse(MouseEventKind::Down(MouseButton::Left), col, row)?;
        self.mouse(MouseEventKind::Up(MouseButton::Left), col, row)?;
        self.render()
    }

    /// Press at the start position and move there without releasing.
    /// Renders so the drop overlay is visible.
    pub fn mouse_drag_hold(
        &mut self,
        start_col: u16,
        start_row: u16,
        end_col: u16,
        end_row: u16,
    ) -> AnyhowResult<()> {
        self.mouse(MouseEventKind::Down(MouseButton::Left), start_col, start_row)?;

        // Interpolate intermediate positions for smooth dragging
        let steps = (i32::from(end_row) - i32::from(start_row))
            .abs()
            .max((i32::from(end_col) - i32::from(start_col)).abs())
            .max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let col = f32::from(start_col) + (f32::from(end_col) - f32::from(start_col)) * t;
            let row = f32::from(start_row) + (f32::from(end_row) - f32::from(start_row)) * t;
            self.mouse(MouseEventKind::Drag(MouseButton::Left), col as u16, row as u16)?;
        }
        self.render()
    }

    /// Move the pointer with the button still held
    pub fn mouse_drag_to(&mut self, col: u16, row: u16) -> AnyhowResult<()> {
        self.mouse(MouseEventKind::Drag(MouseButton::Left), col, row)?;
        self.render()
    }

    /// Full drag gesture: press, move, release
    pub fn mouse_drag(
        &mut self,
        start_col: u16,
        start_row: u16,
        end_col: u16,
        end_row: u16,
    ) -> AnyhowResult<()> {
        self.mouse_drag_hold(start_col, start_row, end_col, end_row)?;
        self.mouse(MouseEventKind::Up(MouseButton::Left), end_col, end_row)?;
        self.render()
    }

    /// Move the synthetic clock forward and run whatever became due
    pub fn advance_time(&mut self, by: Duration) -> AnyhowResult<()> {
        self.clock.advance(by);
        self.tick();
        self.render()
    }

    /// One event loop iteration without input
    fn tick(&mut self) {
        self.editor.check_highlight_timers();
        self.editor.poll_view_updates();
    }

    /// Force a render cycle and capture output
    pub fn render(&mut self) -> AnyhowResult<()> {
        self.terminal.draw(|frame| {
            self.editor.render(frame);
        })?;
        Ok(())
    }

    /// Get the current terminal buffer (what would be displayed)
    pub fn buffer(&self) -> &ratatui::buffer::Buffer {
        self.terminal.backend().buffer()
    }

    /// Get the style (color, modifiers) of a specific cell
    pub fn get_cell_style(&self, x: u16, y: u16) -> Option<ratatui::style::Style> {
        let buffer = self.buffer();
        let pos = buffer.index_of(x, y);
        buffer.content.get(pos).map(|cell| cell.style())
    }

    /// Get the text content of a specific screen row
    pub fn get_row_text(&self, y: u16) -> String {
        let buffer = self.buffer();
        (0..buffer.area.width)
            .filter_map(|x| buffer.content.get(buffer.index_of(x, y)))
            .map(|cell| cell.symbol())
            .collect()
    }

    /// Get entire screen as string (for debugging)
    pub fn screen_to_string(&self) -> String {
        let height = self.buffer().area.height;
        (0..height)
            .map(|y| self.get_row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Verify text appears on screen
    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Verify text does not appear on screen
    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen to not contain '{text}'\nScreen content:\n{screen}"
        );
    }

    pub fn get_status_bar(&self) -> String {
        self.get_row_text(layout::status_bar_row(self.buffer().area.height))
    }

    /// Rectangle of a pane as of the last render
    pub fn pane_rect(&self, pane: PaneId) -> Option<Rect> {
        self.editor
            .cached_layout()
            .pane_rects
            .iter()
            .find(|(id, _)| *id == pane)
            .map(|(_, rect)| *rect)
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn should_quit(&self) -> bool {
        self.editor.should_quit()
    }
}
