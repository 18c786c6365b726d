//! The document store and its dispatcher.
//!
//! `CvStore` exclusively owns the current `CvDocument`. Writers go through
//! `dispatch`; readers take `snapshot()` or `subscribe()` to a watch channel
//! that yields every published document.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::cv::actions::Action;
use crate::cv::reducer::transition;
use crate::models::cv::CvDocument;

pub type CvSnapshot = Arc<CvDocument>;

pub struct CvStore {
    tx: watch::Sender<CvSnapshot>,
}

impl CvStore {
    /// Creates a store holding the all-empty skeleton document.
    pub fn new() -> Self {
        Self::with_document(CvDocument::empty())
    }

    pub fn with_document(doc: CvDocument) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(doc));
        Self { tx }
    }

    /// The current document. Cheap to call; the returned snapshot never changes.
    pub fn snapshot(&self) -> CvSnapshot {
        Arc::clone(&self.tx.borrow())
    }

    /// Receiver that is notified each time a dispatch changes the document.
    pub fn subscribe(&self) -> watch::Receiver<CvSnapshot> {
        self.tx.subscribe()
    }

    /// Applies `action` and publishes the result before returning.
    ///
    /// The watch sender's write lock is held for the whole transition, so two
    /// dispatches never interleave. A transition that leaves the document
    /// unchanged is not published.
    pub fn dispatch(&self, action: Action) -> CvSnapshot {
        let kind = action.kind().to_string();
        let mut published: Option<CvSnapshot> = None;

        let changed = self.tx.send_if_modified(|current| {
            let next = transition(CvDocument::clone(current), action);
            if next == **current {
                published = Some(Arc::clone(current));
                return false;
            }
            let next = Arc::new(next);
            *current = Arc::clone(&next);
            published = Some(next);
            true
        });

        debug!(kind = %kind, changed, "Dispatched action");
        published.unwrap_or_else(|| self.snapshot())
    }
}

impl Default for CvStore {
    fn default() -> Self {
        Self::new()
    }
}
