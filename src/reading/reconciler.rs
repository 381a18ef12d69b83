use std::cmp::Reverse;

use crate::db::Database;
use crate::models::{
    AyahRef, ProgressType, ReadingSignal, SignalKind, TrackingMode, ViewScope,
};

const ENABLE_LOGS: bool = true;
use crate::log_warn;

/// Tie-break order when two signal kinds carry the same timestamp: the most
/// passive signal wins, so a single stray tap never beats settled scroll
/// progress. Policy choice, not a hard requirement; see DESIGN.md.
fn kind_rank(kind: SignalKind) -> u8 {
    match kind {
        SignalKind::Scroll => 0,
        SignalKind::Bookmark => 1,
        SignalKind::Recite => 2,
        SignalKind::Click => 3,
    }
}

fn trusted_kind(mode: TrackingMode) -> Option<SignalKind> {
    match mode {
        TrackingMode::Auto => None,
        TrackingMode::Scroll => Some(SignalKind::Scroll),
        TrackingMode::Bookmark => Some(SignalKind::Bookmark),
        TrackingMode::Reciting => Some(SignalKind::Recite),
        TrackingMode::Click => Some(SignalKind::Click),
    }
}

/// Pure resolution rule: given the already-fetched signals, pick the single
/// ayah to restore to, or `None` for "open at the top". In `Auto` mode the
/// latest timestamp wins across all kinds; a fixed mode only trusts its own
/// kind.
pub fn resolve_position(signals: &[ReadingSignal], mode: TrackingMode) -> Option<AyahRef> {
    let trusted = trusted_kind(mode);
    signals
        .iter()
        .filter(|signal| trusted.map_or(true, |kind| signal.kind == kind))
        .max_by_key(|signal| (signal.observed_at, Reverse(kind_rank(signal.kind))))
        .map(|signal| signal.ayah)
}

/// Query the signal source(s) the mode trusts, across every surah the view
/// renders: a juz view persists under whichever surah the reader stopped in,
/// so restoration searches the whole range. `Auto` fans out to all four
/// sources concurrently so latency is bounded by the slowest single source.
/// A failed query degrades to "no signal from this source".
pub(crate) async fn fetch_signals(
    db: &Database,
    user_id: &str,
    scope: ViewScope,
    progress_type: ProgressType,
    mode: TrackingMode,
) -> Vec<ReadingSignal> {
    let (first, last) = scope.surah_bounds();
    let mut signals = Vec::new();

    match mode {
        TrackingMode::Auto => {
            let (scroll, bookmark, recite, click) = tokio::join!(
                fetch_scroll(db, user_id, first, last, progress_type),
                fetch_bookmark(db, user_id, first, last),
                fetch_interaction(db, user_id, first, last, SignalKind::Recite),
                fetch_interaction(db, user_id, first, last, SignalKind::Click),
            );
            signals.extend([scroll, bookmark, recite, click].into_iter().flatten());
        }
        TrackingMode::Scroll => {
            signals.extend(fetch_scroll(db, user_id, first, last, progress_type).await);
        }
        TrackingMode::Bookmark => {
            signals.extend(fetch_bookmark(db, user_id, first, last).await);
        }
        TrackingMode::Reciting => {
            signals.extend(fetch_interaction(db, user_id, first, last, SignalKind::Recite).await);
        }
        TrackingMode::Click => {
            signals.extend(fetch_interaction(db, user_id, first, last, SignalKind::Click).await);
        }
    }

    signals
}

async fn fetch_scroll(
    db: &Database,
    user_id: &str,
    first: u16,
    last: u16,
    progress_type: ProgressType,
) -> Option<ReadingSignal> {
    match db
        .get_latest_position_in_range(user_id, first, last, progress_type)
        .await
    {
        Ok(position) => position.map(|p| {
            ReadingSignal::new(p.ayah_ref(), SignalKind::Scroll, p.updated_at)
        }),
        Err(err) => {
            log_warn!("scroll position query failed for surahs {first}-{last}: {err:?}");
            None
        }
    }
}

async fn fetch_bookmark(
    db: &Database,
    user_id: &str,
    first: u16,
    last: u16,
) -> Option<ReadingSignal> {
    match db.get_latest_bookmark_in_range(user_id, first, last).await {
        Ok(bookmark) => bookmark.map(|b| {
            ReadingSignal::new(b.ayah, SignalKind::Bookmark, b.created_at)
        }),
        Err(err) => {
            log_warn!("bookmark query failed for surahs {first}-{last}: {err:?}");
            None
        }
    }
}

async fn fetch_interaction(
    db: &Database,
    user_id: &str,
    first: u16,
    last: u16,
    kind: SignalKind,
) -> Option<ReadingSignal> {
    match db
        .get_latest_interaction_in_range(user_id, first, last, kind)
        .await
    {
        Ok(signal) => signal,
        Err(err) => {
            log_warn!(
                "{} interaction query failed for surahs {first}-{last}: {err:?}",
                kind.as_str()
            );
            None
        }
    }
}
