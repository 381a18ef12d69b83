use chrono::{DateTime, TimeZone, Utc};
use mushaf_core::{AyahRef, Database, ProgressType, SignalKind};
use tempfile::TempDir;

fn test_db() -> (TempDir, Database) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Database::new(dir.path().join("mushaf.sqlite3")).expect("open database");
    (dir, db)
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

#[tokio::test]
async fn upsert_position_is_idempotent() {
    let (_dir, db) = test_db();

    db.upsert_position("u1", 2, 120, ProgressType::Scroll, at(1_000))
        .await
        .unwrap();
    db.upsert_position("u1", 2, 120, ProgressType::Scroll, at(1_005))
        .await
        .unwrap();

    let position = db
        .get_latest_position("u1", 2, ProgressType::Scroll)
        .await
        .unwrap()
        .expect("position row");
    assert_eq!(position.ayah, 120);

    // A different ayah replaces the row rather than appending one.
    db.upsert_position("u1", 2, 150, ProgressType::Scroll, at(1_010))
        .await
        .unwrap();
    let position = db
        .get_latest_position("u1", 2, ProgressType::Scroll)
        .await
        .unwrap()
        .expect("position row");
    assert_eq!(position.ayah, 150);
    assert_eq!(position.updated_at, at(1_010));
}

#[tokio::test]
async fn page_and_scroll_progress_are_independent_rows() {
    let (_dir, db) = test_db();

    db.upsert_position("u1", 2, 100, ProgressType::Scroll, at(10))
        .await
        .unwrap();
    db.upsert_position("u1", 2, 200, ProgressType::Page, at(20))
        .await
        .unwrap();

    let scroll = db
        .get_latest_position("u1", 2, ProgressType::Scroll)
        .await
        .unwrap()
        .expect("scroll row");
    let page = db
        .get_latest_position("u1", 2, ProgressType::Page)
        .await
        .unwrap()
        .expect("page row");
    assert_eq!(scroll.ayah, 100);
    assert_eq!(page.ayah, 200);
}

#[tokio::test]
async fn missing_position_is_none() {
    let (_dir, db) = test_db();
    let position = db
        .get_latest_position("u1", 114, ProgressType::Scroll)
        .await
        .unwrap();
    assert!(position.is_none());
}

#[tokio::test]
async fn latest_interaction_per_kind_across_ayahs() {
    let (_dir, db) = test_db();

    db.upsert_interaction("u1", AyahRef::new(2, 5), SignalKind::Recite, at(100))
        .await
        .unwrap();
    db.upsert_interaction("u1", AyahRef::new(2, 9), SignalKind::Recite, at(200))
        .await
        .unwrap();
    db.upsert_interaction("u1", AyahRef::new(2, 40), SignalKind::Click, at(300))
        .await
        .unwrap();

    let recite = db
        .get_latest_interaction("u1", 2, SignalKind::Recite)
        .await
        .unwrap()
        .expect("recite signal");
    assert_eq!(recite.ayah, AyahRef::new(2, 9));
    assert_eq!(recite.observed_at, at(200));

    // Re-reciting the same ayah refreshes its row in place.
    db.upsert_interaction("u1", AyahRef::new(2, 9), SignalKind::Recite, at(400))
        .await
        .unwrap();
    let recite = db
        .get_latest_interaction("u1", 2, SignalKind::Recite)
        .await
        .unwrap()
        .expect("recite signal");
    assert_eq!(recite.ayah, AyahRef::new(2, 9));
    assert_eq!(recite.observed_at, at(400));

    let click = db
        .get_latest_interaction("u1", 2, SignalKind::Click)
        .await
        .unwrap()
        .expect("click signal");
    assert_eq!(click.ayah, AyahRef::new(2, 40));
}

#[tokio::test]
async fn bookmarks_are_additive() {
    let (_dir, db) = test_db();

    let first = db
        .insert_bookmark("u1", AyahRef::new(2, 255), at(100))
        .await
        .unwrap();
    db.insert_bookmark("u1", AyahRef::new(2, 255), at(200))
        .await
        .unwrap();
    db.insert_bookmark("u1", AyahRef::new(2, 30), at(300))
        .await
        .unwrap();

    let all = db.list_bookmarks("u1", 2).await.unwrap();
    assert_eq!(all.len(), 3);

    let latest = db
        .get_latest_bookmark("u1", 2)
        .await
        .unwrap()
        .expect("latest bookmark");
    assert_eq!(latest.ayah, AyahRef::new(2, 30));

    db.delete_bookmark("u1", &first.id).await.unwrap();
    let all = db.list_bookmarks("u1", 2).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn bookmarks_are_scoped_per_user_and_surah() {
    let (_dir, db) = test_db();

    db.insert_bookmark("u1", AyahRef::new(2, 10), at(100))
        .await
        .unwrap();
    db.insert_bookmark("u2", AyahRef::new(2, 20), at(200))
        .await
        .unwrap();

    assert!(db.get_latest_bookmark("u1", 3).await.unwrap().is_none());
    let own = db
        .get_latest_bookmark("u1", 2)
        .await
        .unwrap()
        .expect("own bookmark");
    assert_eq!(own.ayah, AyahRef::new(2, 10));
}

#[tokio::test]
async fn recent_positions_order_and_limit() {
    let (_dir, db) = test_db();

    db.upsert_position("u1", 2, 142, ProgressType::Scroll, at(100))
        .await
        .unwrap();
    db.upsert_position("u1", 18, 10, ProgressType::Scroll, at(300))
        .await
        .unwrap();
    db.upsert_position("u1", 36, 40, ProgressType::Scroll, at(200))
        .await
        .unwrap();

    let recent = db.list_recent_positions("u1", 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].surah, 18);
    assert_eq!(recent[1].surah, 36);
}

#[tokio::test]
async fn range_queries_pick_the_latest_across_surahs() {
    let (_dir, db) = test_db();

    db.upsert_position("u1", 78, 10, ProgressType::Scroll, at(100))
        .await
        .unwrap();
    db.upsert_position("u1", 100, 3, ProgressType::Scroll, at(300))
        .await
        .unwrap();
    // Outside the range, newer timestamp; must not be picked.
    db.upsert_position("u1", 50, 9, ProgressType::Scroll, at(900))
        .await
        .unwrap();

    let latest = db
        .get_latest_position_in_range("u1", 78, 114, ProgressType::Scroll)
        .await
        .unwrap()
        .expect("position in range");
    assert_eq!((latest.surah, latest.ayah), (100, 3));

    db.insert_bookmark("u1", AyahRef::new(80, 2), at(150))
        .await
        .unwrap();
    db.insert_bookmark("u1", AyahRef::new(113, 1), at(250))
        .await
        .unwrap();
    let bookmark = db
        .get_latest_bookmark_in_range("u1", 78, 114)
        .await
        .unwrap()
        .expect("bookmark in range");
    assert_eq!(bookmark.ayah, AyahRef::new(113, 1));

    db.upsert_interaction("u1", AyahRef::new(79, 4), SignalKind::Recite, at(120))
        .await
        .unwrap();
    let recite = db
        .get_latest_interaction_in_range("u1", 78, 114, SignalKind::Recite)
        .await
        .unwrap()
        .expect("recite in range");
    assert_eq!(recite.ayah, AyahRef::new(79, 4));
}

#[tokio::test]
async fn migrating_a_v1_database_carries_rows_over() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mushaf.sqlite3");

    // Lay down a populated v1 database by hand, the shape the first release
    // shipped: no progress_type column, position keyed by (user, surah).
    {
        let conn = rusqlite::Connection::open(&path).expect("open raw connection");
        conn.execute_batch(
            "CREATE TABLE reading_positions (
                 user_id TEXT NOT NULL,
                 surah INTEGER NOT NULL,
                 ayah INTEGER NOT NULL,
                 updated_at TEXT NOT NULL,
                 PRIMARY KEY (user_id, surah)
             );
             CREATE TABLE bookmarks (
                 id TEXT PRIMARY KEY,
                 user_id TEXT NOT NULL,
                 surah INTEGER NOT NULL,
                 ayah INTEGER NOT NULL,
                 created_at TEXT NOT NULL
             );
             CREATE INDEX idx_bookmarks_user_surah
                 ON bookmarks (user_id, surah, created_at);
             CREATE TABLE interactions (
                 user_id TEXT NOT NULL,
                 surah INTEGER NOT NULL,
                 ayah INTEGER NOT NULL,
                 kind TEXT NOT NULL,
                 updated_at TEXT NOT NULL,
                 PRIMARY KEY (user_id, surah, ayah, kind)
             );
             CREATE INDEX idx_interactions_user_surah_kind
                 ON interactions (user_id, surah, kind, updated_at);",
        )
        .expect("apply v1 schema");
        conn.execute(
            "INSERT INTO reading_positions (user_id, surah, ayah, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params!["u1", 2, 142, at(100).to_rfc3339()],
        )
        .expect("seed v1 position");
        conn.pragma_update(None, "user_version", 1)
            .expect("mark as v1");
    }

    // Opening through the crate migrates to v2, rebuilding the positions
    // table; the existing row must come across as scroll progress.
    let db = Database::new(path).expect("migrate to current schema");
    let position = db
        .get_latest_position("u1", 2, ProgressType::Scroll)
        .await
        .unwrap()
        .expect("row carried over by the rebuild");
    assert_eq!(position.surah, 2);
    assert_eq!(position.ayah, 142);
    assert_eq!(position.progress_type, ProgressType::Scroll);
    assert_eq!(position.updated_at, at(100));
}

#[tokio::test]
async fn reopening_the_database_keeps_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mushaf.sqlite3");

    {
        let db = Database::new(path.clone()).expect("open database");
        db.upsert_position("u1", 2, 286, ProgressType::Scroll, at(100))
            .await
            .unwrap();
    }

    let db = Database::new(path).expect("reopen database");
    let position = db
        .get_latest_position("u1", 2, ProgressType::Scroll)
        .await
        .unwrap()
        .expect("row survives reopen and re-running migrations");
    assert_eq!(position.ayah, 286);
}
