//! Study session repository contract and SQLite implementation.
//!
//! # Invariants
//! - Paged lists are ordered newest start first.
//! - `list_records` returns sessions in ascending start order, filtered on
//!   `[from, to)` of the start time.

use super::{
    count_to_u64, ensure_tables, from_epoch_ms, to_epoch_ms, window_params, RepoError,
    RepoResult,
};
use crate::model::session::{RecordRange, SessionId, StudySession, StudySessionDraft, TimeRecord};
use crate::paging::Pagination;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const SESSION_SELECT_SQL: &str = "SELECT
    id,
    start_at,
    end_at,
    duration_seconds,
    subject,
    note
FROM study_sessions";

pub trait SessionRepository {
    /// Stores `draft` as given; `duration` is persisted verbatim.
    fn create_session(&self, draft: &StudySessionDraft) -> RepoResult<SessionId>;
    fn get_session(&self, id: SessionId) -> RepoResult<Option<StudySession>>;
    fn delete_session(&self, id: SessionId) -> RepoResult<()>;
    fn count_sessions(&self) -> RepoResult<u64>;
    fn list_sessions(&self, window: &Pagination) -> RepoResult<Vec<StudySession>>;
    fn list_records(&self, range: &RecordRange) -> RepoResult<Vec<TimeRecord>>;
}

pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["study_sessions"])?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn create_session(&self, draft: &StudySessionDraft) -> RepoResult<SessionId> {
        self.conn.execute(
            "INSERT INTO study_sessions (
                start_at,
                end_at,
                duration_seconds,
                subject,
                note
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                to_epoch_ms(draft.start_time),
                draft.end_time.map(to_epoch_ms),
                draft.duration_seconds,
                draft.subject.as_deref(),
                draft.note.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_session(&self, id: SessionId) -> RepoResult<Option<StudySession>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SESSION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_session_row(row)?));
        }
        Ok(None)
    }

    fn delete_session(&self, id: SessionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM study_sessions WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("study session", id));
        }
        Ok(())
    }

    fn count_sessions(&self) -> RepoResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM study_sessions;", [], |row| row.get(0))?;
        count_to_u64("study_sessions", count)
    }

    fn list_sessions(&self, window: &Pagination) -> RepoResult<Vec<StudySession>> {
        let (limit, offset) = window_params(window);
        let mut stmt = self.conn.prepare(&format!(
            "{SESSION_SELECT_SQL} ORDER BY start_at DESC, id DESC LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![limit, offset])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            sessions.push(parse_session_row(row)?);
        }
        Ok(sessions)
    }

    fn list_records(&self, range: &RecordRange) -> RepoResult<Vec<TimeRecord>> {
        let mut sql = format!("{SESSION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(from) = range.from {
            sql.push_str(" AND start_at >= ?");
            bind_values.push(Value::Integer(to_epoch_ms(from)));
        }
        if let Some(to) = range.to {
            sql.push_str(" AND start_at < ?");
            bind_values.push(Value::Integer(to_epoch_ms(to)));
        }
        sql.push_str(" ORDER BY start_at ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_session_row(row)?.to_record());
        }
        Ok(records)
    }
}

fn parse_session_row(row: &Row<'_>) -> RepoResult<StudySession> {
    let end_time = match row.get::<_, Option<i64>>("end_at")? {
        Some(value) => Some(from_epoch_ms("study_sessions.end_at", value)?),
        None => None,
    };
    Ok(StudySession {
        id: row.get("id")?,
        start_time: from_epoch_ms("study_sessions.start_at", row.get("start_at")?)?,
        end_time,
        duration_seconds: row.get("duration_seconds")?,
        subject: row.get("subject")?,
        note: row.get("note")?,
    })
}
