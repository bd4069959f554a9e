pub mod drag_drop;
mod input;
mod mouse_input;
mod render;
pub mod types;
pub mod workspace;

use crate::config::Config;
use crate::model::document_store::{DocumentStore, OpenError};
use crate::model::event::ViewId;
use crate::model::filesystem::StdFileSystem;
use crate::primitives::highlighter::LexicalHighlighter;
use crate::services::highlight_worker::HighlightWorker;
use crate::services::time_source::{RealTimeSource, SharedTimeSource};
use crate::view::theme::Theme;
use anyhow::Result as AnyhowResult;
use drag_drop::DragDropController;
use std::path::Path;
use std::sync::Arc;
use types::CachedLayout;
use workspace::Workspace;

/// Rows reserved for the status line at the bottom of the screen
pub const STATUS_BAR_ROWS: u16 = 1;

/// The editor: workspace, input state and rendering glue.
pub struct Editor {
    config: Config,
    theme: Theme,

    /// Documents, panes, views and the split layout
    workspace: Workspace,

    /// Tab drag in progress, if any
    drag: DragDropController,

    /// Runs highlight passes off the UI thread. `None` when
    /// `editor.background_highlighting` is off; refreshes then run inline.
    highlight_worker: Option<HighlightWorker>,

    time_source: SharedTimeSource,

    /// Layout from the last render, for mouse hit testing
    cached_layout: CachedLayout,

    should_quit: bool,

    /// One-line message shown in the status bar
    status_message: Option<String>,

    terminal_width: u16,
    terminal_height: u16,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("workspace", &self.workspace)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Create an editor on the real clock
    pub fn new(config: Config, width: u16, height: u16) -> AnyhowResult<Self> {
        Self::with_time_source(config, width, height, RealTimeSource::shared())
    }

    /// Create an editor driven by `time_source`
    pub fn with_time_source(
        config: Config,
        width: u16,
        height: u16,
        time_source: SharedTimeSource,
    ) -> AnyhowResult<Self> {
        let theme = Theme::from_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using default", config.theme);
            Theme::default()
        });

        let store = DocumentStore::new(
            Arc::new(StdFileSystem),
            LexicalHighlighter::new(),
            config.editor.highlight_timing(),
            time_source.clone(),
        );
        let workspace = Workspace::new(store, time_source.clone());

        let highlight_worker = if config.editor.background_highlighting {
            Some(HighlightWorker::spawn()?)
        } else {
            None
        };

        Ok(Self {
            config,
            theme,
            workspace,
            drag: DragDropController::new(),
            highlight_worker,
            time_source,
            cached_layout: CachedLayout::default(),
            should_quit: false,
            status_message: None,
            terminal_width: width,
            terminal_height: height,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn drag(&self) -> &DragDropController {
        &self.drag
    }

    pub fn cached_layout(&self) -> &CachedLayout {
        &self.cached_layout
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Open a file in a new tab of the last focused pane. Failures are also
    /// reported in the status bar.
    pub fn open_file(&mut self, path: &Path) -> Result<ViewId, OpenError> {
        match self.workspace.open_file(path) {
            Ok(view_id) => {
                self.status_message = None;
                Ok(view_id)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.status_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run highlight refreshes whose debounce deadline has passed.
    /// Returns true if anything was refreshed inline (worker results arrive
    /// later as document notifications).
    pub fn check_highlight_timers(&mut self) -> bool {
        let due = self.workspace.documents_due(self.time_source.now());
        if due.is_empty() {
            return false;
        }

        let mut refreshed_inline = false;
        for document in due {
            tracing::trace!("highlight due for {}", document.path().display());
            let queued = self
                .highlight_worker
                .as_ref()
                .is_some_and(|worker| worker.submit(document.clone()));
            if !queued {
                document.refresh();
                refreshed_inline = true;
            }
        }
        refreshed_inline
    }

    /// Drain document notifications into views. Returns true if a repaint is
    /// needed.
    pub fn poll_view_updates(&mut self) -> bool {
        self.workspace.poll_views()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
    }

    /// Content size (rows, columns) of the focused pane, used to keep the
    /// cursor on screen after keyboard edits
    fn active_content_size(&self) -> (usize, usize) {
        let pane = self.workspace.active_pane();
        let rect = self
            .cached_layout
            .pane_rects
            .iter()
            .find(|(id, _)| *id == pane)
            .map(|(_, rect)| *rect);
        let Some(rect) = rect else {
            // Not rendered yet; estimate from the terminal size
            let rows = self
                .terminal_height
                .saturating_sub(STATUS_BAR_ROWS + drag_drop::TAB_HEADER_ROWS);
            return (usize::from(rows), usize::from(self.terminal_width));
        };
        let gutter = self
            .workspace
            .active_view()
            .and_then(|id| self.workspace.view(id))
            .map_or(0, |view| self.gutter_width(view.document().line_count()));
        (
            usize::from(rect.height.saturating_sub(drag_drop::TAB_HEADER_ROWS)),
            usize::from(rect.width.saturating_sub(gutter)),
        )
    }

    /// Width of the line number gutter for a document with `line_count` lines
    fn gutter_width(&self, line_count: usize) -> u16 {
        if !self.config.editor.line_numbers {
            return 0;
        }
        let digits = line_count.max(1).to_string().len() as u16;
        // digits plus one column of padding
        digits.max(3) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::time_source::TestTimeSource;
    use std::time::Duration;

    fn inline_config() -> Config {
        let mut config = Config::default();
        config.editor.background_highlighting = false;
        config
    }

    #[test]
    fn test_open_missing_file_sets_status() {
        let mut editor = Editor::new(inline_config(), 80, 24).unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(editor.open_file(&dir.path().join("nope.rs")).is_err());
        assert!(editor.status_message().is_some());
        assert!(editor.workspace().active_view().is_none());
    }

    #[test]
    fn test_highlight_timer_runs_inline_when_due() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let clock = TestTimeSource::shared();
        let mut editor = Editor::with_time_source(inline_config(), 80, 24, clock.clone()).unwrap();
        let view = editor.open_file(&path).unwrap();

        assert!(!editor.check_highlight_timers());
        clock.advance(Duration::from_millis(300));
        assert!(editor.check_highlight_timers());
        assert!(editor.poll_view_updates());

        let doc = editor.workspace().view(view).unwrap().document().clone();
        assert_eq!(doc.highlight_generation(), 1);
        // already consumed
        assert!(!editor.check_highlight_timers());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let mut config = inline_config();
        config.theme = "no-such-theme".to_string();
        let editor = Editor::new(config, 80, 24).unwrap();
        assert_eq!(editor.theme().name, Theme::default().name);
    }

    #[test]
    fn test_gutter_width() {
        let mut editor = Editor::new(inline_config(), 80, 24).unwrap();
        assert_eq!(editor.gutter_width(5), 4);
        assert_eq!(editor.gutter_width(12_345), 6);
        editor.config.editor.line_numbers = false;
        assert_eq!(editor.gutter_width(12_345), 0);
    }
}
