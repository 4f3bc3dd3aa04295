//! Note repository contract and SQLite implementation.
//!
//! # Invariants
//! - Lists are ordered newest first (`id DESC`).
//! - `delete_all_notes` reports how many rows were removed.

use super::{
    count_to_u64, ensure_tables, from_epoch_ms, window_params, RepoError, RepoResult,
};
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::paging::Pagination;
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT id, title, content, date, created_at FROM notes";

/// Repository interface for note CRUD and paging.
pub trait NoteRepository {
    fn create_note(&self, draft: &NoteDraft) -> RepoResult<NoteId>;
    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Removes every note and returns the number of deleted rows.
    fn delete_all_notes(&self) -> RepoResult<usize>;
    fn count_notes(&self) -> RepoResult<u64>;
    fn list_notes(&self, window: &Pagination) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["notes"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, draft: &NoteDraft) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (title, content, date) VALUES (?1, ?2, ?3);",
            params![draft.title.trim(), draft.content, draft.date.trim()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET title = ?2, content = ?3, date = ?4 WHERE id = ?1;",
            params![id, draft.title.trim(), draft.content, draft.date.trim()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("note", id));
        }
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("note", id));
        }
        Ok(())
    }

    fn delete_all_notes(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM notes;", [])?)
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        count_to_u64("notes", count)
    }

    fn list_notes(&self, window: &Pagination) -> RepoResult<Vec<Note>> {
        let (limit, offset) = window_params(window);
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY id DESC LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![limit, offset])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        date: row.get("date")?,
        created_at: from_epoch_ms("notes.created_at", row.get("created_at")?)?,
    })
}
