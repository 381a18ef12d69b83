use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::models::{AyahRef, PlaybackState, ViewScope};

use super::ScrollRequest;

const ENABLE_LOGS: bool = false;
use crate::log_info;

/// Whether the view passively follows recitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    Idle,
    Following,
}

/// Following requires the whole conjunction: lock on, playback live, and the
/// reciting surah rendered by this view.
pub(crate) fn follow_state(lock: bool, playback: &PlaybackState, scope: ViewScope) -> FollowState {
    match playback.current() {
        Some(current) if lock && scope.contains_surah(current.surah) => FollowState::Following,
        _ => FollowState::Idle,
    }
}

/// Reacts only to playback and lock changes, never to scroll events, so a
/// manual scroll during non-locked playback is never overridden. Entering
/// `Following` arms on the current ayah without scrolling; each subsequent
/// ayah change while following emits exactly one scroll request.
pub(crate) async fn follow_loop(
    scope: ViewScope,
    mut playback_rx: watch::Receiver<PlaybackState>,
    mut lock_rx: watch::Receiver<bool>,
    scroll_tx: mpsc::UnboundedSender<ScrollRequest>,
    cancel: CancellationToken,
) {
    let mut lock = *lock_rx.borrow_and_update();
    let mut playback = *playback_rx.borrow_and_update();
    let mut state = follow_state(lock, &playback, scope);
    let mut last_ayah: Option<AyahRef> = playback.current();

    loop {
        tokio::select! {
            changed = playback_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                playback = *playback_rx.borrow_and_update();
            }
            changed = lock_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                lock = *lock_rx.borrow_and_update();
            }
            _ = cancel.cancelled() => break,
        }

        let next = follow_state(lock, &playback, scope);
        match (state, next) {
            (FollowState::Idle, FollowState::Following) => {
                // Arm on the current ayah; the transition itself never scrolls.
                last_ayah = playback.current();
                log_info!("follow armed at {:?}", last_ayah);
            }
            (FollowState::Following, FollowState::Following) => {
                if let Some(current) = playback.current() {
                    if last_ayah != Some(current) {
                        last_ayah = Some(current);
                        if scroll_tx
                            .send(ScrollRequest::Follow { target: current })
                            .is_err()
                        {
                            break;
                        }
                    }
                }
            }
            (_, FollowState::Idle) => {
                last_ayah = None;
            }
        }
        state = next;
    }
}
