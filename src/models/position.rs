use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AyahRef;

/// Which progress record a position row belongs to. Continuous reading views
/// track `Scroll`; the page-flip view keeps its own independent row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ProgressType {
    #[default]
    Scroll,
    Page,
}

impl ProgressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressType::Scroll => "scroll",
            ProgressType::Page => "page",
        }
    }
}

/// The resolved, persisted "current place" for one surah. At most one row
/// per `(user, surah, progress_type)`; writes are upserts, never appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPosition {
    pub surah: u16,
    pub ayah: u16,
    pub progress_type: ProgressType,
    pub updated_at: DateTime<Utc>,
}

impl ReadingPosition {
    pub fn ayah_ref(&self) -> AyahRef {
        AyahRef::new(self.surah, self.ayah)
    }
}

/// A bookmarked ayah. Additive user data: a reader may bookmark any number
/// of ayahs, so these are never upserted away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub ayah: AyahRef,
    pub created_at: DateTime<Utc>,
}
