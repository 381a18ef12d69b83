use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_kind, to_u16},
};
use crate::models::{AyahRef, ReadingSignal, SignalKind};

fn row_to_signal(row: &Row) -> Result<ReadingSignal> {
    let surah: i64 = row.get("surah")?;
    let ayah: i64 = row.get("ayah")?;
    let kind: String = row.get("kind")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(ReadingSignal {
        ayah: AyahRef::new(to_u16(surah, "surah")?, to_u16(ayah, "ayah")?),
        kind: parse_kind(&kind)?,
        observed_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    /// Latest interaction of one kind within a surah, across all ayahs.
    pub async fn get_latest_interaction(
        &self,
        user_id: &str,
        surah: u16,
        kind: SignalKind,
    ) -> Result<Option<ReadingSignal>> {
        self.get_latest_interaction_in_range(user_id, surah, surah, kind)
            .await
    }

    pub async fn get_latest_interaction_in_range(
        &self,
        user_id: &str,
        first_surah: u16,
        last_surah: u16,
        kind: SignalKind,
    ) -> Result<Option<ReadingSignal>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT surah, ayah, kind, updated_at
                 FROM interactions
                 WHERE user_id = ?1 AND surah BETWEEN ?2 AND ?3 AND kind = ?4
                 ORDER BY updated_at DESC
                 LIMIT 1",
            )?;

            let mut rows = stmt.query(params![user_id, first_surah, last_surah, kind.as_str()])?;
            let signal = match rows.next()? {
                Some(row) => Some(row_to_signal(row)?),
                None => None,
            };
            Ok(signal)
        })
        .await
    }

    /// Only the most recent occurrence of a kind per ayah is kept; repeating
    /// the same interaction overwrites its own row rather than accumulating.
    pub async fn upsert_interaction(
        &self,
        user_id: &str,
        ayah: AyahRef,
        kind: SignalKind,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO interactions (user_id, surah, ayah, kind, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id, surah, ayah, kind) DO UPDATE SET
                     updated_at = excluded.updated_at",
                params![
                    user_id,
                    ayah.surah,
                    ayah.ayah,
                    kind.as_str(),
                    updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }
}
