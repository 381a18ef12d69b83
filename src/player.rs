use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::models::PlaybackState;

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

struct PlayerInner {
    state_tx: watch::Sender<PlaybackState>,
    // Ayah count of the surah being recited, for end-of-surah detection.
    total_ayahs: Mutex<Option<u16>>,
}

/// Facade over the shared recitation player. The audio backend itself lives
/// in the host; this handle owns the authoritative playback state and
/// broadcasts every change on a watch channel. Consumers subscribe; only
/// command methods mutate.
#[derive(Clone)]
pub struct PlayerHandle {
    inner: Arc<PlayerInner>,
}

impl PlayerHandle {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::default());
        Self {
            inner: Arc::new(PlayerInner {
                state_tx,
                total_ayahs: Mutex::new(None),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.inner.state_tx.subscribe()
    }

    pub fn state(&self) -> PlaybackState {
        *self.inner.state_tx.borrow()
    }

    /// Begin reciting a surah from its first ayah.
    pub fn play(&self, surah: u16, total_ayahs: u16) {
        *self.inner.total_ayahs.lock().unwrap() = Some(total_ayahs);
        let _ = self.inner.state_tx.send(PlaybackState {
            playing_surah: Some(surah),
            playing_ayah: Some(1),
            is_playing: true,
        });
    }

    pub fn pause(&self) {
        self.inner.state_tx.send_modify(|state| {
            state.is_playing = false;
        });
    }

    pub fn resume(&self) {
        self.inner.state_tx.send_modify(|state| {
            if state.playing_surah.is_some() {
                state.is_playing = true;
            }
        });
    }

    pub fn stop(&self) {
        *self.inner.total_ayahs.lock().unwrap() = None;
        let _ = self.inner.state_tx.send(PlaybackState::default());
    }

    /// Called by the audio backend as recitation reaches a new ayah.
    /// Advancing past the last ayah of the surah ends playback.
    pub fn advance_to(&self, ayah: u16) {
        let total = *self.inner.total_ayahs.lock().unwrap();
        let finished = matches!(total, Some(total) if ayah > total);
        if finished {
            log_info!("recitation finished, stopping playback");
            self.stop();
            return;
        }

        self.inner.state_tx.send_modify(|state| {
            if state.is_playing {
                state.playing_ayah = Some(ayah);
            }
        });
    }

    /// Codec or network failure while loading recitation audio. Playback
    /// stops; reconciliation state is untouched. Surfacing the transient
    /// notification is the host UI's job, via the state change it observes.
    pub fn fail(&self, reason: &str) {
        log_warn!("recitation playback failed: {reason}");
        self.stop();
    }
}

impl Default for PlayerHandle {
    fn default() -> Self {
        Self::new()
    }
}
