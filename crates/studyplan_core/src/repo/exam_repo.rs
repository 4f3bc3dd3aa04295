//! Exam schedule repository contract and SQLite implementation.
//!
//! # Invariants
//! - Lists are ordered most recently created first.
//! - Subject filtering is an exact, case-sensitive match.
//! - `favorite` is persisted as `0|1`; other values are rejected on read.

use super::{
    count_to_u64, ensure_tables, from_epoch_ms, parse_uuid, to_epoch_ms, window_params,
    RepoError, RepoResult,
};
use crate::model::exam::{Exam, ExamId};
use crate::paging::Pagination;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const EXAM_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    subject,
    start_at,
    end_at,
    room,
    note,
    favorite
FROM exams";

pub trait ExamRepository {
    fn create_exam(&self, exam: &Exam) -> RepoResult<ExamId>;
    fn update_exam(&self, exam: &Exam) -> RepoResult<()>;
    fn get_exam(&self, id: ExamId) -> RepoResult<Option<Exam>>;
    fn delete_exam(&self, id: ExamId) -> RepoResult<()>;
    /// Flips the favorite flag and returns the new value.
    fn toggle_favorite(&self, id: ExamId) -> RepoResult<bool>;
    fn count_exams(&self, subject: Option<&str>) -> RepoResult<u64>;
    fn list_exams(&self, subject: Option<&str>, window: &Pagination) -> RepoResult<Vec<Exam>>;
    /// Distinct subjects, sorted case-insensitively.
    fn list_subjects(&self) -> RepoResult<Vec<String>>;
}

pub struct SqliteExamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExamRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["exams"])?;
        Ok(Self { conn })
    }
}

impl ExamRepository for SqliteExamRepository<'_> {
    fn create_exam(&self, exam: &Exam) -> RepoResult<ExamId> {
        self.conn.execute(
            "INSERT INTO exams (
                uuid,
                title,
                subject,
                start_at,
                end_at,
                room,
                note,
                favorite
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                exam.id.to_string(),
                exam.title.as_str(),
                exam.subject.as_str(),
                to_epoch_ms(exam.start),
                to_epoch_ms(exam.end),
                exam.room.as_deref(),
                exam.note.as_deref(),
                exam.favorite,
            ],
        )?;
        Ok(exam.id)
    }

    fn update_exam(&self, exam: &Exam) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE exams
             SET
                title = ?2,
                subject = ?3,
                start_at = ?4,
                end_at = ?5,
                room = ?6,
                note = ?7,
                favorite = ?8
             WHERE uuid = ?1;",
            params![
                exam.id.to_string(),
                exam.title.as_str(),
                exam.subject.as_str(),
                to_epoch_ms(exam.start),
                to_epoch_ms(exam.end),
                exam.room.as_deref(),
                exam.note.as_deref(),
                exam.favorite,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("exam", exam.id));
        }
        Ok(())
    }

    fn get_exam(&self, id: ExamId) -> RepoResult<Option<Exam>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EXAM_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_exam_row(row)?));
        }
        Ok(None)
    }

    fn delete_exam(&self, id: ExamId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM exams WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("exam", id));
        }
        Ok(())
    }

    fn toggle_favorite(&self, id: ExamId) -> RepoResult<bool> {
        let uuid = id.to_string();
        let changed = self.conn.execute(
            "UPDATE exams SET favorite = 1 - favorite WHERE uuid = ?1;",
            [uuid.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("exam", id));
        }
        let favorite: i64 = self.conn.query_row(
            "SELECT favorite FROM exams WHERE uuid = ?1;",
            [uuid.as_str()],
            |row| row.get(0),
        )?;
        parse_favorite(favorite)
    }

    fn count_exams(&self, subject: Option<&str>) -> RepoResult<u64> {
        let count: i64 = match subject {
            Some(subject) => self.conn.query_row(
                "SELECT COUNT(*) FROM exams WHERE subject = ?1;",
                [subject],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM exams;", [], |row| row.get(0))?,
        };
        count_to_u64("exams", count)
    }

    fn list_exams(&self, subject: Option<&str>, window: &Pagination) -> RepoResult<Vec<Exam>> {
        let mut sql = format!("{EXAM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(subject) = subject {
            sql.push_str(" AND subject = ?");
            bind_values.push(Value::Text(subject.to_string()));
        }

        let (limit, offset) = window_params(window);
        sql.push_str(" ORDER BY rowid DESC LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(limit));
        bind_values.push(Value::Integer(offset));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut exams = Vec::new();
        while let Some(row) = rows.next()? {
            exams.push(parse_exam_row(row)?);
        }
        Ok(exams)
    }

    fn list_subjects(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT subject FROM exams ORDER BY subject COLLATE NOCASE ASC, subject ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(row.get(0)?);
        }
        Ok(subjects)
    }
}

fn parse_exam_row(row: &Row<'_>) -> RepoResult<Exam> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Exam {
        id: parse_uuid("exams.uuid", &uuid_text)?,
        title: row.get("title")?,
        subject: row.get("subject")?,
        start: from_epoch_ms("exams.start_at", row.get("start_at")?)?,
        end: from_epoch_ms("exams.end_at", row.get("end_at")?)?,
        room: row.get("room")?,
        note: row.get("note")?,
        favorite: parse_favorite(row.get("favorite")?)?,
    })
}

fn parse_favorite(value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid favorite value `{other}` in exams.favorite"
        ))),
    }
}
