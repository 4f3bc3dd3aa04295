//! Key/value persistence for UI view state.
//!
//! # Responsibility
//! - Persist small JSON documents keyed by view name.
//! - Offer an in-memory store for callers without a database.
//!
//! # Invariants
//! - `save_state` overwrites any previous value for the key.
//! - Stores never interpret the stored text.

use super::{ensure_tables, RepoResult};
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::collections::HashMap;

/// Storage collaborator for view state documents.
pub trait ViewStateStore {
    fn load_state(&self, key: &str) -> RepoResult<Option<String>>;
    fn save_state(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed store over the `view_state` table.
pub struct SqliteViewStateStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteViewStateStore<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["view_state"])?;
        Ok(Self { conn })
    }
}

impl ViewStateStore for SqliteViewStateStore<'_> {
    fn load_state(&self, key: &str) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM view_state WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn save_state(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO view_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local store; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryViewStateStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryViewStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewStateStore for MemoryViewStateStore {
    fn load_state(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save_state(&self, key: &str, value: &str) -> RepoResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
