use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_u16},
};
use crate::models::{AyahRef, Bookmark};

fn row_to_bookmark(row: &Row) -> Result<Bookmark> {
    let surah: i64 = row.get("surah")?;
    let ayah: i64 = row.get("ayah")?;
    let created_at: String = row.get("created_at")?;

    Ok(Bookmark {
        id: row.get("id")?,
        ayah: AyahRef::new(to_u16(surah, "surah")?, to_u16(ayah, "ayah")?),
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Bookmarks are additive user data, never an upsert: the same ayah may
    /// be bookmarked again and both rows stay.
    pub async fn insert_bookmark(
        &self,
        user_id: &str,
        ayah: AyahRef,
        created_at: DateTime<Utc>,
    ) -> Result<Bookmark> {
        let user_id = user_id.to_string();
        let id = format!("bm_{}", uuid::Uuid::new_v4());
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO bookmarks (id, user_id, surah, ayah, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, user_id, ayah.surah, ayah.ayah, created_at.to_rfc3339()],
            )?;
            Ok(Bookmark {
                id,
                ayah,
                created_at,
            })
        })
        .await
    }

    pub async fn get_latest_bookmark(
        &self,
        user_id: &str,
        surah: u16,
    ) -> Result<Option<Bookmark>> {
        self.get_latest_bookmark_in_range(user_id, surah, surah).await
    }

    pub async fn get_latest_bookmark_in_range(
        &self,
        user_id: &str,
        first_surah: u16,
        last_surah: u16,
    ) -> Result<Option<Bookmark>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, surah, ayah, created_at
                 FROM bookmarks
                 WHERE user_id = ?1 AND surah BETWEEN ?2 AND ?3
                 ORDER BY created_at DESC
                 LIMIT 1",
            )?;

            let mut rows = stmt.query(params![user_id, first_surah, last_surah])?;
            let bookmark = match rows.next()? {
                Some(row) => Some(row_to_bookmark(row)?),
                None => None,
            };
            Ok(bookmark)
        })
        .await
    }

    pub async fn list_bookmarks(&self, user_id: &str, surah: u16) -> Result<Vec<Bookmark>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, surah, ayah, created_at
                 FROM bookmarks
                 WHERE user_id = ?1 AND surah = ?2
                 ORDER BY created_at DESC",
            )?;

            let mut rows = stmt.query(params![user_id, surah])?;
            let mut bookmarks = Vec::new();
            while let Some(row) = rows.next()? {
                bookmarks.push(row_to_bookmark(row)?);
            }
            Ok(bookmarks)
        })
        .await
    }

    pub async fn delete_bookmark(&self, user_id: &str, bookmark_id: &str) -> Result<()> {
        let user_id = user_id.to_string();
        let bookmark_id = bookmark_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM bookmarks WHERE id = ?1 AND user_id = ?2",
                params![bookmark_id, user_id],
            )?;
            Ok(())
        })
        .await
    }
}
