//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Everything else goes through the SettingsPersistence trait.

use crate::{
    error::ConnectorResult,
    persistence::SettingsPersistence,
    settings::Settings,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqliteSettingsStore {
    conn: Connection,
}

impl SqliteSettingsStore {
    /// Open (or create) the settings database at `path`.
    pub fn open(path: &str) -> ConnectorResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; in-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests and by the headless host).
    pub fn in_memory() -> ConnectorResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ConnectorResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_settings.sql"))?;
        Ok(())
    }

    /// Raw stored JSON and its save timestamp, for tooling.
    pub fn raw_entry(&self, key: &str) -> ConnectorResult<Option<(String, String)>> {
        let entry = self
            .conn
            .query_row(
                "SELECT payload, saved_at FROM extension_settings WHERE key = ?1",
                params![key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(entry)
    }

    /// Store a raw payload without validation. Lets tests and migrations
    /// seed copies written by older versions of the host.
    pub fn put_raw(&self, key: &str, payload: &str) -> ConnectorResult<()> {
        self.conn.execute(
            "INSERT INTO extension_settings (key, payload, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, saved_at = excluded.saved_at",
            params![key, payload, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl SettingsPersistence for SqliteSettingsStore {
    async fn load(&self, key: &str) -> ConnectorResult<Option<Settings>> {
        match self.raw_entry(key)? {
            Some((payload, _)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, settings: &Settings) -> ConnectorResult<()> {
        let payload = serde_json::to_string(settings)?;
        self.put_raw(key, &payload)
    }
}
