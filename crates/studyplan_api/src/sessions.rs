//! Study session endpoints.

use crate::response::{respond, ApiError, ApiResponse};
use rusqlite::Connection;
use serde_json::json;
use studyplan_core::{
    PageRequest, SessionId, SessionService, SqliteSessionRepository, StudySessionDraft,
};

fn with_service<T>(
    conn: &Connection,
    call: impl FnOnce(&SessionService<SqliteSessionRepository<'_>>) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let service = SessionService::new(SqliteSessionRepository::try_new(conn)?);
    call(&service)
}

/// `POST /sessions` with `{ startTime, endTime?, duration?, subject?, note? }`.
///
/// `duration` is derived from `endTime - startTime` when omitted.
pub fn record_session(conn: &Connection, body: &str) -> ApiResponse {
    respond("record_session", 201, || {
        let draft: StudySessionDraft = serde_json::from_str(body)?;
        with_service(conn, |service| Ok(service.record_session(draft)?))
    })
}

pub fn get_session(conn: &Connection, id: SessionId) -> ApiResponse {
    respond("get_session", 200, || {
        with_service(conn, |service| Ok(service.get_session(id)?))
    })
}

pub fn delete_session(conn: &Connection, id: SessionId) -> ApiResponse {
    respond("delete_session", 200, || {
        with_service(conn, |service| Ok(service.delete_session(id)?))?;
        Ok(json!({ "message": "session deleted", "id": id }))
    })
}

/// `GET /sessions?page=&limit=`, latest start first.
pub fn list_sessions(conn: &Connection, page: Option<&str>, limit: Option<&str>) -> ApiResponse {
    respond("list_sessions", 200, || {
        let request = PageRequest::from_query(page, limit)?;
        with_service(conn, |service| Ok(service.list_sessions(request)?))
    })
}
