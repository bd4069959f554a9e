//! A pane: an ordered strip of tabs, one of which is current.

use crate::model::event::{PaneId, ViewId};
use crate::view::split::LayoutError;
use unicode_width::UnicodeWidthStr;

/// Gap between tab labels in the header
pub const TAB_GAP: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub view_id: ViewId,
    pub label: String,
}

impl Tab {
    pub fn new(view_id: ViewId, label: impl Into<String>) -> Self {
        Self {
            view_id,
            label: label.into(),
        }
    }

    /// Rendered width: the label padded by one cell each side
    pub fn width(&self) -> u16 {
        u16::try_from(self.label.width() + 2).unwrap_or(u16::MAX)
    }
}

#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    tabs: Vec<Tab>,
    current: usize,
}

impl Pane {
    pub fn new(id: PaneId) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            current: 0,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.tabs.is_empty()).then_some(self.current)
    }

    pub fn current_view(&self) -> Option<ViewId> {
        self.tabs.get(self.current).map(|t| t.view_id)
    }

    pub fn position(&self, view: ViewId) -> Option<usize> {
        self.tabs.iter().position(|t| t.view_id == view)
    }

    /// Append a tab and make it current
    pub fn add_tab(&mut self, tab: Tab) -> usize {
        self.tabs.push(tab);
        self.current = self.tabs.len() - 1;
        self.current
    }

    /// Insert a tab at `index` (clamped to the end) and make it current
    pub fn insert_tab(&mut self, index: usize, tab: Tab) -> usize {
        let index = index.min(self.tabs.len());
        self.tabs.insert(index, tab);
        self.current = index;
        index
    }

    /// Remove the tab at `index`. The current index stays on the same tab
    /// when possible, otherwise moves to the neighbour.
    pub fn remove_tab(&mut self, index: usize) -> Result<Tab, LayoutError> {
        if index >= self.tabs.len() {
            return Err(LayoutError::TabOutOfRange {
                pane: self.id,
                index,
            });
        }
        let tab = self.tabs.remove(index);
        if index < self.current || self.current >= self.tabs.len() {
            self.current = self.current.saturating_sub(1);
        }
        Ok(tab)
    }

    /// Move the tab at `from` so it lands at `to` (clamped) and make it current
    pub fn move_tab(&mut self, from: usize, to: usize) -> Result<(), LayoutError> {
        let tab = self.remove_tab(from)?;
        self.insert_tab(to, tab);
        Ok(())
    }

    pub fn set_current(&mut self, index: usize) -> Result<(), LayoutError> {
        if index >= self.tabs.len() {
            return Err(LayoutError::TabOutOfRange {
                pane: self.id,
                index,
            });
        }
        self.current = index;
        Ok(())
    }

    /// Cycle the current tab by `delta` positions
    pub fn cycle(&mut self, delta: isize) {
        if self.tabs.is_empty() {
            return;
        }
        let len = self.tabs.len() as isize;
        self.current = (self.current as isize + delta).rem_euclid(len) as usize;
    }

    /// Column span `[start, end)` of each tab, relative to the pane's left edge
    pub fn tab_spans(&self) -> Vec<(u16, u16)> {
        let mut x = 0u16;
        self.tabs
            .iter()
            .map(|tab| {
                let start = x;
                let end = start.saturating_add(tab.width());
                x = end.saturating_add(TAB_GAP);
                (start, end)
            })
            .collect()
    }

    /// Index of the tab under a column relative to the pane's left edge
    pub fn tab_at_column(&self, column: u16) -> Option<usize> {
        self.tab_spans()
            .iter()
            .position(|&(start, end)| column >= start && column < end)
    }

    /// Insertion index for a drop at `column`: before the tab under the
    /// pointer, or at the end when past the last tab
    pub fn insertion_index_at(&self, column: u16) -> usize {
        self.tab_spans()
            .iter()
            .position(|&(_, end)| column < end)
            .unwrap_or(self.tabs.len())
    }
}
