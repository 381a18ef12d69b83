use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::db::Database;
use crate::models::{AyahRef, SignalKind};

const ENABLE_LOGS: bool = true;
use crate::log_warn;

/// Best-effort telemetry for UX continuity: audio plays, word taps, tafsir
/// opens, bookmarks. Writes are fire-and-forget; a failed write is logged
/// and swallowed, never surfaced to the reading flow.
pub(crate) struct InteractionRecorder {
    db: Database,
    user_id: String,
    cancel: CancellationToken,
}

impl InteractionRecorder {
    pub fn new(db: Database, user_id: String, cancel: CancellationToken) -> Self {
        Self {
            db,
            user_id,
            cancel,
        }
    }

    pub fn record(&self, ayah: AyahRef, kind: SignalKind) {
        if kind == SignalKind::Scroll {
            // Scroll signals come from the tracker, which owns debouncing.
            log_warn!("ignoring scroll signal sent through the recorder");
            return;
        }

        let db = self.db.clone();
        let user_id = self.user_id.clone();
        let cancel = self.cancel.clone();
        let now = Utc::now();

        tokio::spawn(async move {
            let write = async {
                match kind {
                    SignalKind::Bookmark => {
                        db.insert_bookmark(&user_id, ayah, now).await.map(|_| ())
                    }
                    _ => db.upsert_interaction(&user_id, ayah, kind, now).await,
                }
            };

            tokio::select! {
                result = write => {
                    if let Err(err) = result {
                        log_warn!(
                            "failed to record {} interaction at {ayah}: {err:?}",
                            kind.as_str()
                        );
                    }
                }
                _ = cancel.cancelled() => {}
            }
        });
    }
}
