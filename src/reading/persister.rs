use std::sync::Mutex;

use chrono::Utc;
use tokio::{task::JoinHandle, time::Duration};
use tokio_util::sync::CancellationToken;

use crate::db::Database;
use crate::models::{AyahRef, ProgressType};

const ENABLE_LOGS: bool = true;
use crate::log_warn;

/// Debounced, idempotent upsert of the resolved reading position.
///
/// Each [`ProgressPersister::schedule`] aborts the previous pending flush and
/// arms a new one; only the last value of a scroll burst is written. The
/// flush task captures user, surah and ayah by value at schedule time, so a
/// write that does land always targets the surah it was scheduled for, and
/// the session's cancellation token keeps it from landing after unmount.
pub(crate) struct ProgressPersister {
    db: Database,
    user_id: String,
    progress_type: ProgressType,
    window: Duration,
    cancel: CancellationToken,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ProgressPersister {
    pub fn new(
        db: Database,
        user_id: String,
        progress_type: ProgressType,
        window: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            db,
            user_id,
            progress_type,
            window,
            cancel,
            pending: Mutex::new(None),
        }
    }

    pub fn schedule(&self, target: AyahRef) {
        let mut guard = self.pending.lock().unwrap();
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let db = self.db.clone();
        let user_id = self.user_id.clone();
        let progress_type = self.progress_type;
        let window = self.window;
        let cancel = self.cancel.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(window) => {
                    let result = db
                        .upsert_position(
                            &user_id,
                            target.surah,
                            target.ayah,
                            progress_type,
                            Utc::now(),
                        )
                        .await;
                    if let Err(err) = result {
                        // Non-fatal: the next flush retries the same upsert
                        // with an equal-or-newer value.
                        log_warn!("position flush failed for {target}: {err:?}");
                    }
                }
                _ = cancel.cancelled() => {}
            }
        });

        *guard = Some(handle);
    }

    pub fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for ProgressPersister {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
