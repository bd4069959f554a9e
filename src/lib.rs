//! kode: a terminal text editor with split-pane docking and debounced
//! syntax highlighting.

pub mod app;
pub mod config;
pub mod model;
pub mod primitives;
pub mod services;
pub mod view;
