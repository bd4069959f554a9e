use super::*;
use crate::app::drag_drop::TAB_HEADER_ROWS;
use crate::model::event::{PaneId, SplitDirection, TextPosition};
use crate::primitives::highlighter::StyledLine;
use crate::view::doc_view::View;
use crate::view::pane::{Pane, TAB_GAP};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use std::ops::Range;

impl Editor {
    /// Render the editor to the terminal
    pub fn render(&mut self, frame: &mut Frame) {
        let _span = tracing::trace_span!("render").entered();
        let size = frame.area();
        self.terminal_width = size.width;
        self.terminal_height = size.height;

        let editor_area = Rect::new(
            size.x,
            size.y,
            size.width,
            size.height.saturating_sub(STATUS_BAR_ROWS),
        );
        let status_area = Rect::new(
            size.x,
            size.y + editor_area.height,
            size.width,
            size.height - editor_area.height,
        );

        let pane_rects = self.workspace.layout().pane_rects(editor_area);
        self.cached_layout = CachedLayout {
            editor_area,
            pane_rects: pane_rects.clone(),
        };

        let active = self.workspace.active_pane();
        for (pane_id, rect) in pane_rects {
            self.render_pane(frame, pane_id, rect, pane_id == active);
        }

        for (direction, x, y, length) in self.workspace.layout().separators(editor_area) {
            render_separator(frame, direction, x, y, length, &self.theme);
        }

        self.render_drop_overlay(frame);
        self.render_status_bar(frame, status_area);
    }

    fn render_pane(&self, frame: &mut Frame, pane_id: PaneId, rect: Rect, focused: bool) {
        let Some(pane) = self.workspace.pane(pane_id) else {
            return;
        };
        let header_rows = TAB_HEADER_ROWS.min(rect.height);
        self.render_tab_header(frame, pane, Rect::new(rect.x, rect.y, rect.width, header_rows), focused);

        let content = Rect::new(
            rect.x,
            rect.y + header_rows,
            rect.width,
            rect.height - header_rows,
        );
        let view = pane.current_view().and_then(|id| self.workspace.view(id));
        match view {
            Some(view) => self.render_content(frame, view, content, focused),
            None => {
                let background = Style::default().bg(self.theme.editor_bg);
                frame.render_widget(Paragraph::new("").style(background), content);
            }
        }
    }

    /// Tab labels on the first header row, a rule on the second
    fn render_tab_header(&self, frame: &mut Frame, pane: &Pane, area: Rect, focused: bool) {
        if area.height == 0 {
            return;
        }
        let theme = &self.theme;
        let current = pane.current_index();
        let gap = " ".repeat(usize::from(TAB_GAP));

        let mut spans = Vec::with_capacity(pane.len() * 2);
        for (i, tab) in pane.tabs().iter().enumerate() {
            let style = if Some(i) == current {
                let fg = if focused {
                    theme.tab_focused_indicator
                } else {
                    theme.tab_active_fg
                };
                Style::default()
                    .fg(fg)
                    .bg(theme.tab_active_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .fg(theme.tab_inactive_fg)
                    .bg(theme.tab_inactive_bg)
            };
            spans.push(Span::styled(format!(" {} ", tab.label), style));
            spans.push(Span::raw(gap.clone()));
        }

        let tabs_area = Rect::new(area.x, area.y, area.width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.tab_inactive_bg)),
            tabs_area,
        );

        if area.height > 1 {
            let rule_area = Rect::new(area.x, area.y + 1, area.width, 1);
            let rule = "─".repeat(usize::from(area.width));
            frame.render_widget(
                Paragraph::new(rule).style(Style::default().fg(theme.tab_rule_fg).bg(theme.editor_bg)),
                rule_area,
            );
        }
    }

    fn render_content(&self, frame: &mut Frame, view: &View, area: Rect, focused: bool) {
        let theme = &self.theme;
        let document = view.document();
        let top = view.top_line();
        let height = usize::from(area.height);
        let gutter = self.gutter_width(document.line_count());
        let text_width = usize::from(area.width.saturating_sub(gutter));
        let cursor = view.cursor();
        let selection = view.selection();

        let lines: Vec<Line> = document
            .display_lines(top..top + height)
            .iter()
            .enumerate()
            .map(|(offset, styled)| {
                let line_index = top + offset;
                let mut spans = Vec::new();
                if gutter > 0 {
                    let fg = if line_index == cursor.line {
                        theme.cursor_line_number_fg
                    } else {
                        theme.line_number_fg
                    };
                    spans.push(Span::styled(
                        format!("{:>width$} ", line_index + 1, width = usize::from(gutter - 1)),
                        Style::default().fg(fg),
                    ));
                }
                spans.extend(self.line_spans(
                    styled,
                    line_index,
                    view.left_column(),
                    text_width,
                    selection.as_ref(),
                ));
                Line::from(spans)
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().fg(theme.editor_fg).bg(theme.editor_bg)),
            area,
        );

        if focused && !self.drag.is_dragging() {
            let row = cursor.line.checked_sub(top).filter(|r| *r < height);
            let col = cursor
                .column
                .checked_sub(view.left_column())
                .filter(|c| *c < text_width);
            if let (Some(row), Some(col)) = (row, col) {
                // both offsets are bounded by the area, so they fit in u16
                frame.set_cursor_position((
                    area.x + gutter + col as u16,
                    area.y + row as u16,
                ));
            }
        }
    }

    /// Styled spans for the visible columns of one line, with the selection
    /// painted over the syntax colors
    fn line_spans(
        &self,
        line: &StyledLine,
        line_index: usize,
        left_column: usize,
        width: usize,
        selection: Option<&Range<TextPosition>>,
    ) -> Vec<Span<'static>> {
        let theme = &self.theme;
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut pending = String::new();
        let mut pending_style = Style::default();
        let mut column = 0usize;

        for span in &line.spans {
            let base = match span.category {
                Some(category) => Style::default().fg(category.color(theme)),
                None => Style::default().fg(theme.editor_fg),
            };
            for ch in span.text.chars() {
                let col = column;
                column += 1;
                if col < left_column {
                    continue;
                }
                if col >= left_column + width {
                    break;
                }
                let selected = selection.is_some_and(|sel| {
                    let pos = TextPosition::new(line_index, col);
                    sel.start <= pos && pos < sel.end
                });
                let style = if selected {
                    base.bg(theme.selection_bg)
                } else {
                    base
                };
                if style != pending_style && !pending.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut pending), pending_style));
                }
                pending_style = style;
                pending.push(if ch == '\t' { ' ' } else { ch });
            }
        }
        if !pending.is_empty() {
            spans.push(Span::styled(pending, pending_style));
        }
        spans
    }

    /// Preview of where a dragged tab would land
    fn render_drop_overlay(&self, frame: &mut Frame) {
        let Some(rect) = self.drag.overlay() else {
            return;
        };
        let area = rect.intersection(frame.area());
        if area.width == 0 || area.height == 0 {
            return;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(
                Style::default()
                    .fg(self.theme.drop_overlay_fg)
                    .bg(self.theme.drop_overlay_bg),
            )
            .style(Style::default().bg(self.theme.drop_overlay_fill));
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let text = match &self.status_message {
            Some(message) => format!(" {message}"),
            None => self.status_text(),
        };
        frame.render_widget(
            Paragraph::new(text).style(
                Style::default()
                    .fg(self.theme.status_bar_fg)
                    .bg(self.theme.status_bar_bg),
            ),
            area,
        );
    }

    /// Focused file, cursor and grammar
    fn status_text(&self) -> String {
        let Some(view) = self
            .workspace
            .active_view()
            .and_then(|id| self.workspace.view(id))
        else {
            return " [No file]".to_string();
        };
        let document = view.document();
        let cursor = view.cursor();
        let grammar = document.grammar().map_or("-", |language| language.name());
        format!(
            " {} | Ln {}, Col {} | {}",
            document.file_name(),
            cursor.line + 1,
            cursor.column + 1,
            grammar
        )
    }
}

/// Render a split separator line
fn render_separator(
    frame: &mut Frame,
    direction: SplitDirection,
    x: u16,
    y: u16,
    length: u16,
    theme: &Theme,
) {
    let style = Style::default().fg(theme.split_separator_fg);
    match direction {
        // side by side panes: vertical line
        SplitDirection::Horizontal => {
            for offset in 0..length {
                frame.render_widget(Paragraph::new("│").style(style), Rect::new(x, y + offset, 1, 1));
            }
        }
        SplitDirection::Vertical => {
            let line_text = "─".repeat(usize::from(length));
            frame.render_widget(Paragraph::new(line_text).style(style), Rect::new(x, y, length, 1));
        }
    }
}
