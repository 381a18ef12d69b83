use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_progress_type, to_u16},
};
use crate::models::{ProgressType, ReadingPosition};

fn row_to_position(row: &Row) -> Result<ReadingPosition> {
    let surah: i64 = row.get("surah")?;
    let ayah: i64 = row.get("ayah")?;
    let progress_type: String = row.get("progress_type")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(ReadingPosition {
        surah: to_u16(surah, "surah")?,
        ayah: to_u16(ayah, "ayah")?,
        progress_type: parse_progress_type(&progress_type)?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn get_latest_position(
        &self,
        user_id: &str,
        surah: u16,
        progress_type: ProgressType,
    ) -> Result<Option<ReadingPosition>> {
        self.get_latest_position_in_range(user_id, surah, surah, progress_type)
            .await
    }

    /// Latest position across a contiguous surah range. A juz view persists
    /// under whichever surah the reader actually stopped in, so its
    /// restoration has to look at every surah the juz renders.
    pub async fn get_latest_position_in_range(
        &self,
        user_id: &str,
        first_surah: u16,
        last_surah: u16,
        progress_type: ProgressType,
    ) -> Result<Option<ReadingPosition>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT surah, ayah, progress_type, updated_at
                 FROM reading_positions
                 WHERE user_id = ?1 AND surah BETWEEN ?2 AND ?3 AND progress_type = ?4
                 ORDER BY updated_at DESC
                 LIMIT 1",
            )?;

            let mut rows = stmt.query(params![
                user_id,
                first_surah,
                last_surah,
                progress_type.as_str()
            ])?;
            let position = match rows.next()? {
                Some(row) => Some(row_to_position(row)?),
                None => None,
            };
            Ok(position)
        })
        .await
    }

    /// Create-or-replace by `(user, surah, progress_type)`. Repeating a flush
    /// with the same ayah converges to the same row, which is what makes
    /// racing debounced writes safe without any locking.
    pub async fn upsert_position(
        &self,
        user_id: &str,
        surah: u16,
        ayah: u16,
        progress_type: ProgressType,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO reading_positions (user_id, surah, progress_type, ayah, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id, surah, progress_type) DO UPDATE SET
                     ayah = excluded.ayah,
                     updated_at = excluded.updated_at",
                params![
                    user_id,
                    surah,
                    progress_type.as_str(),
                    ayah,
                    updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Most recently touched surahs for the "continue reading" list.
    pub async fn list_recent_positions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ReadingPosition>> {
        let user_id = user_id.to_string();
        let limit = limit as i64;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT surah, ayah, progress_type, updated_at
                 FROM reading_positions
                 WHERE user_id = ?1
                 ORDER BY updated_at DESC
                 LIMIT ?2",
            )?;

            let mut rows = stmt.query(params![user_id, limit])?;
            let mut positions = Vec::new();
            while let Some(row) = rows.next()? {
                positions.push(row_to_position(row)?);
            }
            Ok(positions)
        })
        .await
    }
}
