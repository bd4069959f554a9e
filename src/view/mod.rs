//! View layer
//!
//! Panes, tabs, per-tab views, the split layout and themes.

pub mod doc_view;
pub mod pane;
pub mod split;
pub mod theme;
