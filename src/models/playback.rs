use serde::{Deserialize, Serialize};

use super::AyahRef;

/// Read-only snapshot of the shared recitation player, broadcast on a watch
/// channel. Consumers never mutate this directly; they issue commands on
/// [`crate::player::PlayerHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub playing_surah: Option<u16>,
    pub playing_ayah: Option<u16>,
    pub is_playing: bool,
}

impl PlaybackState {
    /// The ayah currently being recited, when playback is live.
    pub fn current(&self) -> Option<AyahRef> {
        if !self.is_playing {
            return None;
        }
        match (self.playing_surah, self.playing_ayah) {
            (Some(surah), Some(ayah)) => Some(AyahRef::new(surah, ayah)),
            _ => None,
        }
    }
}
