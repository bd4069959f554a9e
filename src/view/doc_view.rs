//! A view: one tab's window onto a shared document.
//!
//! Each view owns its own cursor, selection anchor and scroll position, so
//! two tabs showing the same file move independently while editing the same
//! text.

use crate::model::document::Document;
use crate::model::event::{DocumentEvent, TextPosition, ViewId};
use std::ops::Range;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct View {
    id: ViewId,
    document: Arc<Document>,
    events: Receiver<DocumentEvent>,
    cursor: TextPosition,
    /// Other end of the selection, if one is active
    anchor: Option<TextPosition>,
    /// First visible line
    top_line: usize,
    /// First visible column
    left_column: usize,
}

impl View {
    pub fn new(id: ViewId, document: Arc<Document>) -> Self {
        let events = document.subscribe();
        Self {
            id,
            document,
            events,
            cursor: TextPosition::default(),
            anchor: None,
            top_line: 0,
            left_column: 0,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn cursor(&self) -> TextPosition {
        self.cursor
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn left_column(&self) -> usize {
        self.left_column
    }

    /// The selected range in document order, if any
    pub fn selection(&self) -> Option<Range<TextPosition>> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some(anchor.min(self.cursor)..anchor.max(self.cursor))
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Drain pending document notifications. Returns true if any arrived,
    /// meaning the view needs a redraw.
    pub fn poll_notifications(&mut self) -> bool {
        let mut changed = false;
        let mut contents_changed = false;
        while let Ok(event) = self.events.try_recv() {
            changed = true;
            if event == DocumentEvent::ContentsChanged {
                contents_changed = true;
            }
        }
        if contents_changed {
            // Another view may have shortened the text under us
            self.cursor = self.document.clamp(self.cursor);
            self.anchor = self.anchor.map(|a| self.document.clamp(a));
        }
        changed
    }

    /// Move the cursor, extending the selection when `extend` is set
    pub fn set_cursor(&mut self, pos: TextPosition, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = self.document.clamp(pos);
    }

    /// Replace the selection (or insert at the cursor) with `text`
    pub fn insert_text(&mut self, text: &str, now: Instant) {
        let range = self.selection().unwrap_or(self.cursor..self.cursor);
        self.cursor = self.document.edit(range, text, now);
        self.anchor = None;
    }

    pub fn insert_newline(&mut self, now: Instant) {
        self.insert_text("\n", now);
    }

    /// Delete the selection, or the char before the cursor (joining lines at column 0)
    pub fn backspace(&mut self, now: Instant) {
        if self.delete_selection(now) {
            return;
        }
        let TextPosition { line, column } = self.cursor;
        let start = if column > 0 {
            TextPosition::new(line, column - 1)
        } else if line > 0 {
            TextPosition::new(line - 1, self.document.line_len(line - 1))
        } else {
            return;
        };
        self.cursor = self.document.edit(start..self.cursor, "", now);
    }

    /// Delete the selection, or the char after the cursor (joining lines at line end)
    pub fn delete_forward(&mut self, now: Instant) {
        if self.delete_selection(now) {
            return;
        }
        let TextPosition { line, column } = self.cursor;
        let end = if column < self.document.line_len(line) {
            TextPosition::new(line, column + 1)
        } else if line + 1 < self.document.line_count() {
            TextPosition::new(line + 1, 0)
        } else {
            return;
        };
        self.cursor = self.document.edit(self.cursor..end, "", now);
    }

    fn delete_selection(&mut self, now: Instant) -> bool {
        match self.selection() {
            Some(range) => {
                self.cursor = self.document.edit(range, "", now);
                self.anchor = None;
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        let TextPosition { line, column } = self.cursor;
        let pos = if column > 0 {
            TextPosition::new(line, column - 1)
        } else if line > 0 {
            TextPosition::new(line - 1, self.document.line_len(line - 1))
        } else {
            self.cursor
        };
        self.set_cursor(pos, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        let TextPosition { line, column } = self.cursor;
        let pos = if column < self.document.line_len(line) {
            TextPosition::new(line, column + 1)
        } else if line + 1 < self.document.line_count() {
            TextPosition::new(line + 1, 0)
        } else {
            self.cursor
        };
        self.set_cursor(pos, extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        let TextPosition { line, column } = self.cursor;
        let pos = if line > 0 {
            TextPosition::new(line - 1, column)
        } else {
            TextPosition::new(0, 0)
        };
        self.set_cursor(pos, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let TextPosition { line, column } = self.cursor;
        let last = self.document.line_count().saturating_sub(1);
        let pos = if line < last {
            TextPosition::new(line + 1, column)
        } else {
            TextPosition::new(last, self.document.line_len(last))
        };
        self.set_cursor(pos, extend);
    }

    pub fn move_line_start(&mut self, extend: bool) {
        self.set_cursor(TextPosition::new(self.cursor.line, 0), extend);
    }

    pub fn move_line_end(&mut self, extend: bool) {
        let line = self.cursor.line;
        self.set_cursor(
            TextPosition::new(line, self.document.line_len(line)),
            extend,
        );
    }

    /// Scroll so the cursor is inside a `height` x `width` viewport
    pub fn ensure_cursor_visible(&mut self, height: usize, width: usize) {
        if height > 0 {
            if self.cursor.line < self.top_line {
                self.top_line = self.cursor.line;
            } else if self.cursor.line >= self.top_line + height {
                self.top_line = self.cursor.line + 1 - height;
            }
        }
        if width > 0 {
            if self.cursor.column < self.left_column {
                self.left_column = self.cursor.column;
            } else if self.cursor.column >= self.left_column + width {
                self.left_column = self.cursor.column + 1 - width;
            }
        }
    }

    /// Scroll vertically by `delta` lines without moving the cursor
    pub fn scroll_by(&mut self, delta: isize) {
        let max_top = self.document.line_count().saturating_sub(1);
        self.top_line = self.top_line.saturating_add_signed(delta).min(max_top);
    }
}
