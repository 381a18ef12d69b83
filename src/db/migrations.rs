use anyhow::{bail, Context, Result};
use rusqlite::{Connection, Transaction};

const CURRENT_SCHEMA_VERSION: i32 = 2;

const SCHEMA_V1: &str = "
CREATE TABLE reading_positions (
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
    ON interactions (user_id, surah, kind, updated_at);
";

// The page-flip view keeps progress independently of the scroll view, so the
// position key grows a progress_type column. SQLite cannot alter a primary
// key in place; rebuild the table and carry existing rows over as 'scroll'.
const SCHEMA_V2: &str = "
CREATE TABLE reading_positions_new (
    user_id TEXT NOT NULL,
    surah INTEGER NOT NULL,
    progress_type TEXT NOT NULL DEFAULT 'scroll',
    ayah INTEGER NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, surah, progress_type)
);

INSERT INTO reading_positions_new (user_id, surah, progress_type, ayah, updated_at)
    SELECT user_id, surah, 'scroll', ayah, updated_at FROM reading_positions;

DROP TABLE reading_positions;

ALTER TABLE reading_positions_new RENAME TO reading_positions;
";

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let mut version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    if version > CURRENT_SCHEMA_VERSION {
        bail!(
            "database version ({}) is newer than supported schema ({})",
            version,
            CURRENT_SCHEMA_VERSION
        );
    }

    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("failed to open migration transaction")?;

    while version < CURRENT_SCHEMA_VERSION {
        let next_version = version + 1;
        apply_migration(&tx, next_version)
            .with_context(|| format!("migration to version {next_version} failed"))?;
        version = next_version;
    }

    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .context("failed to update user_version pragma")?;
    tx.commit().context("failed to commit migrations")?;

    Ok(())
}

fn apply_migration(tx: &Transaction<'_>, version: i32) -> Result<()> {
    match version {
        1 => tx
            .execute_batch(SCHEMA_V1)
            .context("failed to apply schema v1"),
        2 => tx
            .execute_batch(SCHEMA_V2)
            .context("failed to apply schema v2"),
        _ => bail!("unknown migration target version: {version}"),
    }
}
