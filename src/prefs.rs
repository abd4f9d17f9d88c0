// Durable key-value preference storage

use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key under which the dark-mode flag is persisted, as a JSON-encoded boolean.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Durable string key-value store for user preferences.
///
/// Values are opaque to this layer; callers decide the encoding. The task
/// list itself is never persisted, only preferences.
pub trait KeyValue {
    /// Read the value stored under `key`, or `None` if unset
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any prior value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<P: KeyValue + ?Sized> KeyValue for &mut P {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed preference store, durable across process restarts
pub struct SqlitePrefs {
    db: Connection,
}

impl SqlitePrefs {
    /// Open or create a preference database at the given file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }

        let db = Connection::open(path).context("Failed to open preferences database")?;

        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS prefs (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        debug!(path = ?path, "Opened preference store");
        Ok(Self { db })
    }
}

impl KeyValue for SqlitePrefs {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM prefs WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .context("Failed to read preference")?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO prefs (key, value) VALUES (?1, ?2)",
                rusqlite::params![key, value],
            )
            .context("Failed to write preference")?;
        Ok(())
    }
}

/// In-memory preference store for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: HashMap<String, String>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryPrefs {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
