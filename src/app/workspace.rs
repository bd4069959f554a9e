//! The workspace: every registry the editor needs, owned in one place.
//!
//! Documents, the pane layout, panes and views all live here and are passed
//! around by reference. Nothing is global.

use crate::app::types::{DropZone, TabDrop};
use crate::model::document::Document;
use crate::model::document_store::{DocumentStore, OpenError};
use crate::model::event::{PaneId, ViewId};
use crate::services::time_source::SharedTimeSource;
use crate::view::doc_view::View;
use crate::view::pane::{Pane, Tab};
use crate::view::split::{LayoutError, SplitManager};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct Workspace {
    store: DocumentStore,
    layout: SplitManager,
    panes: HashMap<PaneId, Pane>,
    views: HashMap<ViewId, View>,
    next_pane_id: usize,
    next_view_id: usize,
    time_source: SharedTimeSource,
}

impl Workspace {
    /// A workspace with one empty pane
    pub fn new(store: DocumentStore, time_source: SharedTimeSource) -> Self {
        let first = PaneId(0);
        let mut panes = HashMap::new();
        panes.insert(first, Pane::new(first));
        Self {
            store,
            layout: SplitManager::new(first),
            panes,
            views: HashMap::new(),
            next_pane_id: 1,
            next_view_id: 0,
            time_source,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn layout(&self) -> &SplitManager {
        &self.layout
    }

    pub fn now(&self) -> Instant {
        self.time_source.now()
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(&id)
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    /// Panes in layout order
    pub fn panes(&self) -> Vec<&Pane> {
        self.layout
            .pane_ids()
            .into_iter()
            .filter_map(|id| self.panes.get(&id))
            .collect()
    }

    pub fn pane_count(&self) -> usize {
        self.layout.pane_count()
    }

    /// The last focused pane
    pub fn active_pane(&self) -> PaneId {
        self.layout.active_pane()
    }

    /// The current view of the last focused pane
    pub fn active_view(&self) -> Option<ViewId> {
        self.pane(self.active_pane()).and_then(Pane::current_view)
    }

    pub fn active_view_mut(&mut self) -> Option<&mut View> {
        let id = self.active_view()?;
        self.views.get_mut(&id)
    }

    /// Pane whose tab strip holds `view`
    pub fn pane_of_view(&self, view: ViewId) -> Option<PaneId> {
        self.panes
            .values()
            .find(|p| p.position(view).is_some())
            .map(Pane::id)
    }

    /// A pane received focus
    pub fn focus_changed(&mut self, pane: PaneId) -> bool {
        self.layout.set_active_pane(pane)
    }

    pub fn focus_next_pane(&mut self) {
        self.layout.next_pane();
    }

    pub fn focus_prev_pane(&mut self) {
        self.layout.prev_pane();
    }

    fn allocate_pane_id(&mut self) -> PaneId {
        let id = PaneId(self.next_pane_id);
        self.next_pane_id += 1;
        id
    }

    fn allocate_view_id(&mut self) -> ViewId {
        let id = ViewId(self.next_view_id);
        self.next_view_id += 1;
        id
    }

    /// Open `path` in a new tab of the last focused pane
    pub fn open_file(&mut self, path: &Path) -> Result<ViewId, OpenError> {
        let document = self.store.open(path)?;
        let view_id = self.allocate_view_id();
        let label = document.file_name();
        self.views.insert(view_id, View::new(view_id, document));

        let pane_id = self.active_pane();
        if let Some(pane) = self.panes.get_mut(&pane_id) {
            pane.add_tab(Tab::new(view_id, label));
        }
        tracing::info!("opened view {:?} in pane {:?}", view_id, pane_id);
        Ok(view_id)
    }

    /// Make the tab at `index` current and focus its pane
    pub fn select_tab(&mut self, pane: PaneId, index: usize) -> Result<(), LayoutError> {
        self.panes
            .get_mut(&pane)
            .ok_or(LayoutError::PaneNotFound(pane))?
            .set_current(index)?;
        self.layout.set_active_pane(pane);
        Ok(())
    }

    /// Close a tab. Its document is released, and the pane is removed if it
    /// becomes empty (unless it is the last pane).
    pub fn close_tab(&mut self, pane_id: PaneId, index: usize) -> Result<(), LayoutError> {
        let pane = self
            .panes
            .get_mut(&pane_id)
            .ok_or(LayoutError::PaneNotFound(pane_id))?;
        let tab = pane.remove_tab(index)?;
        let now_empty = pane.is_empty();

        if let Some(view) = self.views.remove(&tab.view_id) {
            self.store.release(view.document().path());
        }
        if now_empty {
            self.remove_empty_pane(pane_id);
        }
        Ok(())
    }

    /// Close the current tab of the focused pane
    pub fn close_current_tab(&mut self) -> Result<(), LayoutError> {
        let pane_id = self.active_pane();
        let index = self
            .pane(pane_id)
            .and_then(Pane::current_index)
            .ok_or(LayoutError::TabOutOfRange {
                pane: pane_id,
                index: 0,
            })?;
        self.close_tab(pane_id, index)
    }

    fn remove_empty_pane(&mut self, pane_id: PaneId) {
        match self.layout.remove_leaf(pane_id) {
            Ok(()) => {
                self.panes.remove(&pane_id);
            }
            Err(LayoutError::LastPane) => {}
            Err(e) => tracing::warn!("failed to remove empty pane: {}", e),
        }
    }

    /// Move a dragged tab to its drop zone.
    ///
    /// - Tab bar / center of another pane: the tab moves into that pane
    /// - Tab bar / center of its own pane: the tab is reordered
    /// - A margin: a new pane is created beside the target
    ///
    /// A source pane left empty is removed (collapsing splitters) before the
    /// new pane is inserted. The moved tab becomes current and its pane gets
    /// focus. Dropping a pane's only tab on a margin of the same pane does
    /// nothing.
    pub fn execute_tab_drop(&mut self, drop: TabDrop) -> Result<(), LayoutError> {
        let TabDrop {
            view_id,
            source_pane,
            zone,
        } = drop;
        let target = zone.pane_id();

        let source = self
            .panes
            .get(&source_pane)
            .ok_or(LayoutError::PaneNotFound(source_pane))?;
        let from = source.position(view_id).ok_or(LayoutError::ViewNotFound {
            pane: source_pane,
            view: view_id,
        })?;
        let source_len = source.len();
        if !self.layout.contains(target) || !self.panes.contains_key(&target) {
            return Err(LayoutError::PaneNotFound(target));
        }

        let destination = match zone.split_placement() {
            None if source_pane == target => {
                let to = match zone {
                    DropZone::TabBar { index, .. } if index > from => index - 1,
                    DropZone::TabBar { index, .. } => index,
                    _ => source_len - 1,
                };
                if let Some(pane) = self.panes.get_mut(&source_pane) {
                    pane.move_tab(from, to)?;
                }
                source_pane
            }
            None => {
                let tab = self.take_tab(source_pane, from)?;
                if let Some(pane) = self.panes.get_mut(&target) {
                    match zone {
                        DropZone::TabBar { index, .. } => pane.insert_tab(index, tab),
                        _ => pane.add_tab(tab),
                    };
                }
                target
            }
            Some(_) if source_pane == target && source_len == 1 => {
                tracing::debug!("dropping the only tab beside itself, nothing to do");
                return Ok(());
            }
            Some((direction, side)) => {
                let new_pane = self.allocate_pane_id();
                let tab = self.take_tab(source_pane, from)?;
                self.layout
                    .split_insert(target, direction, side, new_pane)?;
                let mut pane = Pane::new(new_pane);
                pane.add_tab(tab);
                self.panes.insert(new_pane, pane);
                new_pane
            }
        };

        self.layout.set_active_pane(destination);
        tracing::info!(
            "moved view {:?} from pane {:?} to pane {:?}",
            view_id,
            source_pane,
            destination
        );
        Ok(())
    }

    /// Remove a tab from a pane, dropping the pane if it is left empty
    fn take_tab(&mut self, pane_id: PaneId, index: usize) -> Result<Tab, LayoutError> {
        let pane = self
            .panes
            .get_mut(&pane_id)
            .ok_or(LayoutError::PaneNotFound(pane_id))?;
        let tab = pane.remove_tab(index)?;
        if pane.is_empty() {
            self.remove_empty_pane(pane_id);
        }
        Ok(tab)
    }

    /// Documents whose debounce deadline has passed (each reported once)
    pub fn documents_due(&self, now: Instant) -> Vec<Arc<Document>> {
        self.store
            .documents()
            .into_iter()
            .filter(|doc| doc.take_due_refresh(now))
            .collect()
    }

    /// Drain document notifications for every view. Returns true if any view
    /// needs redrawing.
    pub fn poll_views(&mut self) -> bool {
        self.views
            .values_mut()
            .fold(false, |changed, view| view.poll_notifications() || changed)
    }
}
