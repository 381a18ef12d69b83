mod ayah;
mod playback;
mod position;
mod signal;

pub use ayah::{juz_start, AyahRef, ViewScope, JUZ_STARTS};
pub use playback::PlaybackState;
pub use position::{Bookmark, ProgressType, ReadingPosition};
pub use signal::{ReadingSignal, SignalKind, TrackingMode};
