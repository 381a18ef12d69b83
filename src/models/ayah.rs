use std::fmt;

use serde::{Deserialize, Serialize};

/// A single verse address. Ordering follows reading order: surah first,
/// then ayah within the surah.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct AyahRef {
    pub surah: u16,
    pub ayah: u16,
}

impl AyahRef {
    pub fn new(surah: u16, ayah: u16) -> Self {
        Self { surah, ayah }
    }
}

impl fmt::Display for AyahRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

/// First ayah of each of the 30 ajza (Hafs division), in reading order.
pub const JUZ_STARTS: [(u16, u16); 30] = [
    (1, 1),
    (2, 142),
    (2, 253),
    (3, 93),
    (4, 24),
    (4, 148),
    (5, 82),
    (6, 111),
    (7, 88),
    (8, 41),
    (9, 93),
    (11, 6),
    (12, 53),
    (15, 1),
    (17, 1),
    (18, 75),
    (21, 1),
    (23, 1),
    (25, 21),
    (27, 56),
    (29, 46),
    (33, 31),
    (36, 28),
    (39, 32),
    (41, 47),
    (46, 1),
    (51, 31),
    (58, 1),
    (67, 1),
    (78, 1),
];

pub fn juz_start(juz: u8) -> AyahRef {
    let idx = usize::from(juz.clamp(1, 30)) - 1;
    let (surah, ayah) = JUZ_STARTS[idx];
    AyahRef::new(surah, ayah)
}

/// Which reading view a session is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewScope {
    Surah(u16),
    Juz(u8),
}

impl ViewScope {
    /// Surah whose signal history seeds restoration for this view.
    pub fn primary_surah(&self) -> u16 {
        match self {
            ViewScope::Surah(surah) => *surah,
            ViewScope::Juz(juz) => juz_start(*juz).surah,
        }
    }

    /// Inclusive bounds of the surahs this view renders. A surah view is its
    /// own single-element range; a juz view spans every surah the juz
    /// touches, so both persistence and restoration operate over the lot.
    pub fn surah_bounds(&self) -> (u16, u16) {
        match self {
            ViewScope::Surah(surah) => (*surah, *surah),
            ViewScope::Juz(juz) => juz_surah_range(*juz),
        }
    }

    /// Whether an ayah of the given surah is rendered by this view.
    pub fn contains_surah(&self, surah: u16) -> bool {
        let (first, last) = self.surah_bounds();
        surah >= first && surah <= last
    }
}

fn juz_surah_range(juz: u8) -> (u16, u16) {
    let juz = juz.clamp(1, 30);
    let (first, _) = JUZ_STARTS[usize::from(juz) - 1];
    // A juz ends where the next one starts; when the next juz opens a fresh
    // surah, that surah is no longer part of this range.
    let last = match JUZ_STARTS.get(usize::from(juz)) {
        Some(&(next_surah, 1)) => next_surah - 1,
        Some(&(next_surah, _)) => next_surah,
        None => 114,
    };
    (first, last)
}
