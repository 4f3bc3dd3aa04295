//! Note endpoints.

use crate::response::{respond, ApiError, ApiResponse};
use rusqlite::Connection;
use serde_json::json;
use studyplan_core::{NoteDraft, NoteId, NoteService, PageRequest, SqliteNoteRepository};

fn with_service<T>(
    conn: &Connection,
    call: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let service = NoteService::new(SqliteNoteRepository::try_new(conn)?);
    call(&service)
}

/// `GET /notes?page=&limit=` → `{ data, extraInfo }`, newest first.
pub fn list_notes(conn: &Connection, page: Option<&str>, limit: Option<&str>) -> ApiResponse {
    respond("list_notes", 200, || {
        let request = PageRequest::from_query(page, limit)?;
        with_service(conn, |service| Ok(service.list_notes(request)?))
    })
}

/// `POST /notes` with `{ title, content, date }` → `201` and the stored note.
pub fn create_note(conn: &Connection, body: &str) -> ApiResponse {
    respond("create_note", 201, || {
        let draft: NoteDraft = serde_json::from_str(body)?;
        with_service(conn, |service| Ok(service.create_note(&draft)?))
    })
}

pub fn get_note(conn: &Connection, id: NoteId) -> ApiResponse {
    respond("get_note", 200, || {
        with_service(conn, |service| Ok(service.get_note(id)?))
    })
}

pub fn update_note(conn: &Connection, id: NoteId, body: &str) -> ApiResponse {
    respond("update_note", 200, || {
        let draft: NoteDraft = serde_json::from_str(body)?;
        with_service(conn, |service| Ok(service.update_note(id, &draft)?))
    })
}

pub fn delete_note(conn: &Connection, id: NoteId) -> ApiResponse {
    respond("delete_note", 200, || {
        with_service(conn, |service| Ok(service.delete_note(id)?))?;
        Ok(json!({ "message": "note deleted", "id": id }))
    })
}

/// `DELETE /notes` → `{ message, deleted }`.
pub fn delete_all_notes(conn: &Connection) -> ApiResponse {
    respond("delete_all_notes", 200, || {
        let deleted = with_service(conn, |service| Ok(service.delete_all_notes()?))?;
        Ok(json!({ "message": "all notes deleted", "deleted": deleted }))
    })
}
