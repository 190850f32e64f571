use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};

use super::KvStore;
use crate::error::Result;

const STORE_DB: &str = "store.db";

/// Key-value store backed by a single SQLite table
pub struct SqliteKv {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteKv {
    /// Open or create `store.db` inside `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(STORE_DB);
        let conn = Connection::open(&path)?;

        let kv = Self {
            conn,
            path: Some(path),
        };
        kv.init_schema()?;
        Ok(kv)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let kv = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        kv.init_schema()?;
        Ok(kv)
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn exists_in(dir: &Path) -> bool {
        dir.join(STORE_DB).exists()
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Writes every entry in one transaction, so a save is all-or-nothing
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                [*key, value.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
