//! Background thread that runs document highlight passes.
//!
//! The event loop hands over documents whose debounce timer fired; the worker
//! calls [`Document::refresh`] on each. Results reach views through the
//! document's own notifications, so the worker never touches the UI.

use crate::model::document::Document;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

pub struct HighlightWorker {
    sender: Option<Sender<Arc<Document>>>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for HighlightWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightWorker")
            .field("running", &self.handle.is_some())
            .finish()
    }
}

impl HighlightWorker {
    /// Spawn the worker thread
    pub fn spawn() -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<Arc<Document>>();
        let handle = std::thread::Builder::new()
            .name("highlight-worker".to_string())
            .spawn(move || {
                tracing::debug!("highlight worker started");
                while let Ok(document) = receiver.recv() {
                    document.refresh();
                }
                tracing::debug!("highlight worker stopped");
            })?;
        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue a refresh. Returns false if the worker has gone away.
    pub fn submit(&self, document: Arc<Document>) -> bool {
        match &self.sender {
            Some(sender) => sender.send(document).is_ok(),
            None => false,
        }
    }
}

impl Drop for HighlightWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("highlight worker panicked");
            }
        }
    }
}
