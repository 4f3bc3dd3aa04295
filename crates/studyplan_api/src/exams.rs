//! Exam schedule endpoints.
//!
//! Ids travel as UUID strings; a malformed id is a client error.

use crate::response::{respond, ApiError, ApiResponse};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::json;
use studyplan_core::{ExamDraft, ExamId, ExamService, PageRequest, SqliteExamRepository};

fn with_service<T>(
    conn: &Connection,
    call: impl FnOnce(&ExamService<SqliteExamRepository<'_>>) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let service = ExamService::new(SqliteExamRepository::try_new(conn)?);
    call(&service)
}

fn parse_id(raw: &str) -> Result<ExamId, ApiError> {
    Ok(ExamId::parse_str(raw.trim())?)
}

/// `GET /exams?subject=&page=&limit=`; a blank subject lists every exam.
pub fn list_exams(
    conn: &Connection,
    subject: Option<&str>,
    page: Option<&str>,
    limit: Option<&str>,
) -> ApiResponse {
    respond("list_exams", 200, || {
        let request = PageRequest::from_query(page, limit)?;
        with_service(conn, |service| Ok(service.list_exams(subject, request)?))
    })
}

pub fn create_exam(conn: &Connection, body: &str) -> ApiResponse {
    respond("create_exam", 201, || {
        let draft: ExamDraft = serde_json::from_str(body)?;
        with_service(conn, |service| Ok(service.create_exam(draft)?))
    })
}

pub fn get_exam(conn: &Connection, id: &str) -> ApiResponse {
    respond("get_exam", 200, || {
        let id = parse_id(id)?;
        with_service(conn, |service| Ok(service.get_exam(id)?))
    })
}

pub fn update_exam(conn: &Connection, id: &str, body: &str) -> ApiResponse {
    respond("update_exam", 200, || {
        let id = parse_id(id)?;
        let draft: ExamDraft = serde_json::from_str(body)?;
        with_service(conn, |service| Ok(service.update_exam(id, draft)?))
    })
}

pub fn delete_exam(conn: &Connection, id: &str) -> ApiResponse {
    respond("delete_exam", 200, || {
        let id = parse_id(id)?;
        with_service(conn, |service| Ok(service.delete_exam(id)?))?;
        Ok(json!({ "message": "exam deleted", "id": id }))
    })
}

/// Flips the favorite flag; returns the updated exam.
pub fn toggle_favorite(conn: &Connection, id: &str) -> ApiResponse {
    respond("toggle_favorite", 200, || {
        let id = parse_id(id)?;
        with_service(conn, |service| Ok(service.toggle_favorite(id)?))
    })
}

/// `GET /exams/subjects` → `{ data: [..] }`.
pub fn list_subjects(conn: &Connection) -> ApiResponse {
    respond("list_subjects", 200, || {
        let subjects = with_service(conn, |service| Ok(service.subjects()?))?;
        Ok(json!({ "data": subjects }))
    })
}

/// Seeds the first-run demo exams relative to `now` when none are stored.
/// `{ data: [..] }` lists only the exams that were added.
pub fn seed_demo(conn: &Connection, now: DateTime<Utc>) -> ApiResponse {
    respond("seed_exams", 200, || {
        let seeded = with_service(conn, |service| Ok(service.seed_demo_if_empty(now)?))?;
        Ok(json!({ "data": seeded }))
    })
}
