use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AyahRef;

/// The kind of engagement that produced a reading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKind {
    Scroll,
    Bookmark,
    Recite,
    Click,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Scroll => "scroll",
            SignalKind::Bookmark => "bookmark",
            SignalKind::Recite => "recite",
            SignalKind::Click => "click",
        }
    }
}

/// An observed fact about where the user engaged, not the position itself.
/// Immutable once recorded; resolution only ever looks at the latest signal
/// of each kind for a surah.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSignal {
    pub ayah: AyahRef,
    pub kind: SignalKind,
    pub observed_at: DateTime<Utc>,
}

impl ReadingSignal {
    pub fn new(ayah: AyahRef, kind: SignalKind, observed_at: DateTime<Utc>) -> Self {
        Self {
            ayah,
            kind,
            observed_at,
        }
    }
}

/// Which signal source(s) the reconciler trusts, per user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TrackingMode {
    #[default]
    Auto,
    Scroll,
    Bookmark,
    Reciting,
    Click,
}

impl TrackingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingMode::Auto => "auto",
            TrackingMode::Scroll => "scroll",
            TrackingMode::Bookmark => "bookmark",
            TrackingMode::Reciting => "reciting",
            TrackingMode::Click => "click",
        }
    }
}
