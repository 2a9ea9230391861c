use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: i64 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    conn.pragma_update(None, "wal_autocheckpoint", 100)?;

    // In-memory databases legitimately fail this; that's fine.
    if conn
        .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
        .is_ok()
    {
        tracing::info!("startup WAL checkpoint complete");
    }

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS contacts (
            id                  TEXT PRIMARY KEY,
            user_id             TEXT NOT NULL,
            name                TEXT NOT NULL,
            email               TEXT,
            company             TEXT,
            title               TEXT,
            tier                TEXT NOT NULL DEFAULT 'fern',
            growth_stage        TEXT NOT NULL DEFAULT 'seed',
            tags                TEXT NOT NULL DEFAULT '[]',
            last_interaction_at TEXT NOT NULL,
            health_score        REAL NOT NULL DEFAULT 1.0,
            decay_rate          REAL NOT NULL,
            total_interactions  INTEGER NOT NULL DEFAULT 0,
            is_favorite         INTEGER NOT NULL DEFAULT 0,
            is_archived         INTEGER NOT NULL DEFAULT 0,
            created_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS interactions (
            id          TEXT PRIMARY KEY,
            contact_id  TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL,
            kind        TEXT NOT NULL DEFAULT 'other',
            source      TEXT NOT NULL DEFAULT 'manual',
            notes       TEXT,
            happened_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_contacts_user ON contacts(user_id, is_archived);
        CREATE INDEX IF NOT EXISTS idx_interactions_contact ON interactions(contact_id);
        CREATE INDEX IF NOT EXISTS idx_interactions_user ON interactions(user_id);
        ",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<Option<i64>> {
    let mut stmt = conn.prepare("SELECT value FROM metadata WHERE key = 'schema_version'")?;
    let version = stmt
        .query_row([], |row| {
            let v: String = row.get(0)?;
            Ok(v.parse::<i64>().unwrap_or(0))
        })
        .ok();
    Ok(version)
}
