//! Debounced local-to-global propagation for section editors.
//!
//! Each editor owns one `Debouncer`. Every `schedule` cancels the pending
//! commit and starts a fresh quiescence window; only the last action scheduled
//! within a window reaches the store. There is no early flush.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cv::actions::Action;
use crate::cv::completeness::CvSection;
use crate::cv::store::CvStore;

/// Input-quiescence window used by the editors.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Debouncer {
    store: Arc<CvStore>,
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(store: Arc<CvStore>, window: Duration) -> Self {
        Self {
            store,
            window,
            pending: Mutex::new(None),
        }
    }

    /// Replaces any pending commit with `action`, dispatched once the window
    /// elapses without another call. Must be called inside a tokio runtime.
    pub fn schedule(&self, action: Action) {
        let store = Arc::clone(&self.store);
        let window = self.window;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            debug!(kind = %action.kind(), "Debounce window elapsed, committing draft");
            store.dispatch(action);
        }));
    }

    /// Drops the pending commit, if any, without dispatching it.
    pub fn cancel(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
            debug!("Pending draft cancelled");
        }
    }

    /// True while a scheduled commit has not yet run.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// One debouncer per section editor, created on first use.
pub struct DraftDebouncers {
    store: Arc<CvStore>,
    window: Duration,
    editors: Mutex<HashMap<CvSection, Arc<Debouncer>>>,
}

impl DraftDebouncers {
    pub fn new(store: Arc<CvStore>, window: Duration) -> Self {
        Self {
            store,
            window,
            editors: Mutex::new(HashMap::new()),
        }
    }

    pub fn for_editor(&self, editor: CvSection) -> Arc<Debouncer> {
        let mut editors = self.editors.lock().unwrap_or_else(PoisonError::into_inner);
        let debouncer = editors
            .entry(editor)
            .or_insert_with(|| Arc::new(Debouncer::new(Arc::clone(&self.store), self.window)));
        Arc::clone(debouncer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::PersonalInfo;

    fn set_name(name: &str) -> Action {
        Action::SetPersonalInfo(PersonalInfo {
            full_name: name.to_string(),
            ..PersonalInfo::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_edit_in_window_is_dispatched() {
        let store = Arc::new(CvStore::new());
        let mut rx = store.subscribe();
        let debouncer = Debouncer::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        debouncer.schedule(set_name("A"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(set_name("Ad"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(set_name("Ada"));

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(store.snapshot().personal_info.full_name.is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.snapshot().personal_info.full_name, "Ada");
        assert!(!debouncer.is_pending());

        // Exactly one publication reached subscribers.
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_each_dispatch() {
        let store = Arc::new(CvStore::new());
        let debouncer = Debouncer::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        debouncer.schedule(Action::AddSkill("Rust".to_string()));
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.schedule(Action::AddSkill("SQL".to_string()));
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(
            store.snapshot().skills,
            vec!["Rust".to_string(), "SQL".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_editors_debounce_independently() {
        let store = Arc::new(CvStore::new());
        let drafts = DraftDebouncers::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        drafts
            .for_editor(CvSection::PersonalInfo)
            .schedule(set_name("Ada"));
        drafts
            .for_editor(CvSection::Skills)
            .schedule(Action::AddSkill("Rust".to_string()));

        tokio::time::sleep(Duration::from_millis(350)).await;
        let doc = store.snapshot();
        assert_eq!(doc.personal_info.full_name, "Ada");
        assert_eq!(doc.skills, vec!["Rust".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_commit() {
        let store = Arc::new(CvStore::new());
        let debouncer = Debouncer::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        debouncer.schedule(set_name("Ada"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(store.snapshot().personal_info.full_name.is_empty());

        // Cancelling with nothing pending is harmless.
        debouncer.cancel();
    }

    #[test]
    fn test_same_editor_shares_one_debouncer() {
        let drafts = DraftDebouncers::new(Arc::new(CvStore::new()), DEFAULT_DEBOUNCE);
        let a = drafts.for_editor(CvSection::Education);
        let b = drafts.for_editor(CvSection::Education);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &drafts.for_editor(CvSection::Skills)));
    }
}
