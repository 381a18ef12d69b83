use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use crate::local_store::LocalStore;
use crate::models::AyahRef;

use super::viewport::{ayah_at_midpoint, AyahBox, Viewport};

const ENABLE_LOGS: bool = true;
use crate::log_warn;

/// Tracks which ayah sits nearest the viewport center as the user scrolls.
///
/// The first call to [`ScrollTracker::observe`] flips a one-shot
/// `user_scrolled` flag; programmatic restore scrolls go through the scroll
/// request channel instead and never touch this, so a deep-link jump on load
/// cannot masquerade as reading progress.
pub(crate) struct ScrollTracker {
    local: Arc<LocalStore>,
    user_scrolled: AtomicBool,
    last_visible: Mutex<Option<AyahRef>>,
}

impl ScrollTracker {
    pub fn new(local: Arc<LocalStore>) -> Self {
        Self {
            local,
            user_scrolled: AtomicBool::new(false),
            last_visible: Mutex::new(None),
        }
    }

    /// Handle one genuine scroll event. Returns the ayah at the viewport
    /// midpoint, if any; the undebounced local fallback is written before
    /// the caller gets to schedule the remote flush.
    pub fn observe(&self, viewport: Viewport, boxes: &[AyahBox]) -> Option<AyahRef> {
        self.user_scrolled.store(true, Ordering::Release);

        let target = ayah_at_midpoint(viewport, boxes)?;
        *self.last_visible.lock().unwrap() = Some(target);

        if let Err(err) = self.local.set_last_position(target) {
            log_warn!("local fallback write failed for {target}: {err:?}");
        }

        Some(target)
    }

    pub fn has_user_scrolled(&self) -> bool {
        self.user_scrolled.load(Ordering::Acquire)
    }

    pub fn last_visible(&self) -> Option<AyahRef> {
        *self.last_visible.lock().unwrap()
    }
}
