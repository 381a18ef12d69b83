//! Reading-position core for a Quran reading app.
//!
//! Reconciles the independent "where did the user last engage" signals
//! (scroll progress, bookmarks, recitation, taps) into one restored
//! position per view mount, persists progress safely under rapid scrolling
//! and navigation, and follows audio recitation when the auto-scroll lock
//! is on. The rendering layer, content APIs and auth are host concerns;
//! the host feeds scroll events in and performs the [`ScrollRequest`]s
//! that come out.

mod db;
mod local_store;
mod logging;
mod models;
mod player;
mod reading;
mod settings;

pub use db::Database;
pub use local_store::LocalStore;
pub use models::{
    juz_start, AyahRef, Bookmark, PlaybackState, ProgressType, ReadingPosition, ReadingSignal,
    SignalKind, TrackingMode, ViewScope, JUZ_STARTS,
};
pub use player::PlayerHandle;
pub use reading::{
    ayah_at_midpoint, resolve_position, AyahBox, FollowState, ReadingSession, ScrollRequest,
    SessionConfig, Viewport, DEFAULT_DEBOUNCE_WINDOW,
};
pub use settings::SettingsStore;
