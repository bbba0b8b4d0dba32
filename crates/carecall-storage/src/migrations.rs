//! Versioned schema migrations, tracked in SQLite's `user_version` pragma.

use rusqlite::Connection;
use tracing::info;

use crate::error::StorageError;

const MIGRATIONS: &[(u32, &str)] = &[
    (
        1,
        "CREATE TABLE user_information (
            user_id TEXT PRIMARY KEY NOT NULL,
            information TEXT NOT NULL,
            phone_number TEXT,
            age TEXT,
            gender TEXT,
            occupation TEXT,
            relationship_status TEXT,
            living_situation TEXT,
            mental_health_diagnosis TEXT,
            therapy_history TEXT,
            psychiatric_medication TEXT,
            mental_health_hospitalization TEXT,
            past_self_harm_thoughts TEXT,
            current_self_harm_thoughts TEXT,
            additional_info TEXT,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX idx_user_information_phone ON user_information (phone_number);

        CREATE TABLE phone_call_reports (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            mood INTEGER NOT NULL CHECK (mood BETWEEN 1 AND 5),
            mood_description TEXT NOT NULL,
            emotions TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER NOT NULL
        );
        CREATE INDEX idx_phone_call_reports_user_created
            ON phone_call_reports (user_id, created_at);",
    ),
    (
        2,
        "ALTER TABLE phone_call_reports ADD COLUMN conversation_id TEXT;
        CREATE UNIQUE INDEX idx_phone_call_reports_conversation
            ON phone_call_reports (conversation_id)
            WHERE conversation_id IS NOT NULL;",
    ),
];

/// Latest schema version this build knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0)
}

pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Apply every migration newer than the database's recorded version, each
/// in its own transaction.
pub fn run(conn: &mut Connection) -> Result<(), StorageError> {
    let current = current_version(conn)?;

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        info!(version, "applying migration");
        let tx = conn.transaction()?;
        tx.execute_batch(sql).map_err(|e| StorageError::Migration {
            version: *version,
            reason: e.to_string(),
        })?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }

    Ok(())
}
