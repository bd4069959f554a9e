//! Core data model
//!
//! Documents, the shared document registry, ids and events.

pub mod document;
pub mod document_store;
pub mod event;
pub mod filesystem;
