//! The per-view-mount reading core: scroll tracking, position
//! reconciliation, debounced persistence and playback follow.
//!
//! A [`ReadingSession`] is created when a surah or juz view mounts and torn
//! down when it unmounts. All asynchronous work it spawns (the restoration
//! query, pending debounced flushes, the follow loop) is tied to one
//! cancellation token, so unmount is a single cancel-and-join and nothing
//! attributable to the view lands afterwards.

mod follow;
mod persister;
mod reconciler;
mod recorder;
mod tracker;
mod viewport;

pub use follow::FollowState;
pub use reconciler::resolve_position;
pub use viewport::{ayah_at_midpoint, AyahBox, Viewport};

use std::sync::Arc;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Duration,
};
use tokio_util::sync::CancellationToken;

use crate::db::Database;
use crate::local_store::LocalStore;
use crate::models::{AyahRef, ProgressType, SignalKind, ViewScope};
use crate::player::PlayerHandle;
use crate::settings::SettingsStore;

use follow::follow_loop;
use persister::ProgressPersister;
use reconciler::fetch_signals;
use recorder::InteractionRecorder;
use tracker::ScrollTracker;

pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_secs(2);

/// A scroll the host view should perform, emitted on the session's request
/// channel. Both kinds are smooth centered scrolls; they are tagged so a
/// host can animate restoration differently from recitation follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// One-shot jump performed on mount (deep link or reconciled position).
    Restore { target: AyahRef },
    /// Follow of the reciting ayah while the auto-scroll lock is on.
    Follow { target: AyahRef },
}

impl ScrollRequest {
    pub fn target(&self) -> AyahRef {
        match self {
            ScrollRequest::Restore { target } | ScrollRequest::Follow { target } => *target,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub user_id: String,
    pub scope: ViewScope,
    /// Explicit ayah from the URL; wins over all signal reconciliation.
    pub deep_link: Option<AyahRef>,
    pub progress_type: ProgressType,
    pub debounce_window: Duration,
}

impl SessionConfig {
    pub fn new(user_id: impl Into<String>, scope: ViewScope) -> Self {
        Self {
            user_id: user_id.into(),
            scope,
            deep_link: None,
            progress_type: ProgressType::Scroll,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

/// One mounted reading view.
pub struct ReadingSession {
    scope: ViewScope,
    cancel: CancellationToken,
    tracker: ScrollTracker,
    persister: ProgressPersister,
    recorder: InteractionRecorder,
    restored_rx: watch::Receiver<bool>,
    restore_task: Option<JoinHandle<()>>,
    follow_task: Option<JoinHandle<()>>,
}

impl ReadingSession {
    /// Mount the session: spawns the restoration query and the playback
    /// follow loop, and returns the channel of scrolls the host view must
    /// perform. Restoration runs once per mount; the returned receiver sees
    /// at most one `Restore` request, then any number of `Follow`s.
    pub fn mount(
        config: SessionConfig,
        db: Database,
        local: Arc<LocalStore>,
        settings: Arc<SettingsStore>,
        player: &PlayerHandle,
    ) -> (Self, mpsc::UnboundedReceiver<ScrollRequest>) {
        let (scroll_tx, scroll_rx) = mpsc::unbounded_channel();
        let (restored_tx, restored_rx) = watch::channel(false);
        let cancel = CancellationToken::new();

        let restore_task = tokio::spawn(restore(
            config.clone(),
            db.clone(),
            settings,
            scroll_tx.clone(),
            restored_tx,
            cancel.clone(),
        ));

        let follow_task = tokio::spawn(follow_loop(
            config.scope,
            player.subscribe(),
            local.subscribe_lock(),
            scroll_tx,
            cancel.clone(),
        ));

        let session = Self {
            scope: config.scope,
            tracker: ScrollTracker::new(local),
            persister: ProgressPersister::new(
                db.clone(),
                config.user_id.clone(),
                config.progress_type,
                config.debounce_window,
                cancel.clone(),
            ),
            recorder: InteractionRecorder::new(db, config.user_id, cancel.clone()),
            cancel,
            restored_rx,
            restore_task: Some(restore_task),
            follow_task: Some(follow_task),
        };

        (session, scroll_rx)
    }

    pub fn scope(&self) -> ViewScope {
        self.scope
    }

    /// Handle one genuine user scroll event. Programmatic scroll-into-view
    /// must not be routed here, or it would count as reading progress.
    pub fn on_scroll(&self, viewport: Viewport, boxes: &[AyahBox]) {
        let Some(target) = self.tracker.observe(viewport, boxes) else {
            return;
        };

        // The remote flush stays inert until restoration has resolved, so a
        // half-rendered view can never overwrite an advanced position with
        // its own top-of-page ayah.
        if *self.restored_rx.borrow() {
            self.persister.schedule(target);
        }
    }

    /// Record a discrete interaction (recite, click, bookmark), best-effort.
    pub fn record(&self, ayah: AyahRef, kind: SignalKind) {
        self.recorder.record(ayah, kind);
    }

    pub fn has_user_scrolled(&self) -> bool {
        self.tracker.has_user_scrolled()
    }

    pub fn last_visible_ayah(&self) -> Option<AyahRef> {
        self.tracker.last_visible()
    }

    pub fn is_restored(&self) -> bool {
        *self.restored_rx.borrow()
    }

    /// Wait until the mount-time restoration has resolved (target sent or
    /// no-op). Mainly useful to hosts that defer rendering overlays.
    pub async fn restored(&self) {
        let mut rx = self.restored_rx.clone();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Tear the session down: cancels the restoration query, any pending
    /// debounced flush and the follow loop, and joins the spawned tasks.
    pub async fn unmount(mut self) {
        self.cancel.cancel();
        self.persister.cancel_pending();

        if let Some(handle) = self.restore_task.take() {
            let _ = handle.await;
        }
        if let Some(handle) = self.follow_task.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ReadingSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn restore(
    config: SessionConfig,
    db: Database,
    settings: Arc<SettingsStore>,
    scroll_tx: mpsc::UnboundedSender<ScrollRequest>,
    restored_tx: watch::Sender<bool>,
    cancel: CancellationToken,
) {
    let resolve = async {
        if let Some(target) = config.deep_link {
            // An explicit URL target outranks every signal source.
            let _ = scroll_tx.send(ScrollRequest::Restore { target });
        } else {
            // Read the mode at the moment of restoration; it may have
            // changed since the session was configured.
            let mode = settings.tracking_mode();
            let signals = fetch_signals(
                &db,
                &config.user_id,
                config.scope,
                config.progress_type,
                mode,
            )
            .await;

            if let Some(target) = resolve_position(&signals, mode) {
                let _ = scroll_tx.send(ScrollRequest::Restore { target });
            }
        }

        let _ = restored_tx.send(true);
    };

    tokio::select! {
        _ = resolve => {}
        _ = cancel.cancelled() => {}
    }
}
