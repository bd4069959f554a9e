//! Registry of open documents, keyed by canonical path.
//!
//! Opening a path that is already open returns the same shared [`Document`];
//! every view of a file therefore edits one in-memory copy. Each successful
//! `open` counts as one view association, and [`DocumentStore::release`]
//! evicts the document once the last association is gone.

use crate::model::document::{Document, HighlightTiming};
use crate::model::filesystem::{FileSystem, StdFileSystem};
use crate::primitives::highlighter::LexicalHighlighter;
use crate::services::time_source::{RealTimeSource, SharedTimeSource};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Error returned when a file cannot be opened
#[derive(Debug)]
pub enum OpenError {
    /// The file could not be resolved or read
    Read { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot open {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
        }
    }
}

struct Entry {
    document: Arc<Document>,
    views: usize,
}

pub struct DocumentStore {
    fs: Arc<dyn FileSystem>,
    highlighter: LexicalHighlighter,
    timing: HighlightTiming,
    time_source: SharedTimeSource,
    docs: Mutex<HashMap<PathBuf, Entry>>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("open", &self.len())
            .finish_non_exhaustive()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(
            Arc::new(StdFileSystem),
            LexicalHighlighter::new(),
            HighlightTiming::default(),
            RealTimeSource::shared(),
        )
    }
}

impl DocumentStore {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        highlighter: LexicalHighlighter,
        timing: HighlightTiming,
        time_source: SharedTimeSource,
    ) -> Self {
        Self {
            fs,
            highlighter,
            timing,
            time_source,
            docs: Mutex::new(HashMap::new()),
        }
    }

    /// Open `path`, returning the shared document for it.
    ///
    /// The registry lock is held across read and construction, so concurrent
    /// opens of the same new path build one document.
    pub fn open(&self, path: &Path) -> Result<Arc<Document>, OpenError> {
        let read_error = |source| OpenError::Read {
            path: path.to_path_buf(),
            source,
        };
        let canonical = self.fs.canonicalize(path).map_err(read_error)?;

        let mut docs = self.docs.lock();
        if let Some(entry) = docs.get_mut(&canonical) {
            entry.views += 1;
            tracing::debug!(
                "reusing open document {} ({} views)",
                canonical.display(),
                entry.views
            );
            return Ok(entry.document.clone());
        }

        let bytes = self.fs.read_file(&canonical).map_err(read_error)?;
        let text = String::from_utf8_lossy(&bytes);
        let document = Arc::new(Document::new(
            canonical.clone(),
            &text,
            self.highlighter.clone(),
            self.timing,
            self.time_source.now(),
        ));
        tracing::info!(
            "opened {} ({} lines)",
            canonical.display(),
            document.line_count()
        );
        docs.insert(
            canonical,
            Entry {
                document: document.clone(),
                views: 1,
            },
        );
        Ok(document)
    }

    /// Drop one view association; the document is evicted when none remain.
    /// Returns true if it was evicted.
    pub fn release(&self, path: &Path) -> bool {
        let mut docs = self.docs.lock();
        let Some(entry) = docs.get_mut(path) else {
            return false;
        };
        entry.views = entry.views.saturating_sub(1);
        if entry.views == 0 {
            docs.remove(path);
            tracing::info!("closed {}", path.display());
            true
        } else {
            false
        }
    }

    /// Look up an open document by canonical path
    pub fn get(&self, path: &Path) -> Option<Arc<Document>> {
        self.docs.lock().get(path).map(|e| e.document.clone())
    }

    /// All open documents
    pub fn documents(&self) -> Vec<Arc<Document>> {
        self.docs
            .lock()
            .values()
            .map(|e| e.document.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
