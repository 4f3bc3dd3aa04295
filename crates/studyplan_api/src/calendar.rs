//! Study calendar endpoints.

use crate::response::{respond, ApiError, ApiResponse};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::json;
use studyplan_core::{
    CalendarEvent, CalendarEventDraft, CalendarEventId, CalendarService, SqliteCalendarRepository,
};

fn with_service<T>(
    conn: &Connection,
    call: impl FnOnce(&CalendarService<SqliteCalendarRepository<'_>>) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let service = CalendarService::new(SqliteCalendarRepository::try_new(conn)?);
    call(&service)
}

fn parse_id(raw: &str) -> Result<CalendarEventId, ApiError> {
    Ok(CalendarEventId::parse_str(raw.trim())?)
}

/// `GET /calendar` → `{ data: [..] }` ordered by start.
pub fn list_events(conn: &Connection) -> ApiResponse {
    respond("list_events", 200, || {
        let events = with_service(conn, |service| Ok(service.list_events()?))?;
        Ok(json!({ "data": events }))
    })
}

pub fn add_event(conn: &Connection, body: &str) -> ApiResponse {
    respond("add_event", 201, || {
        let draft: CalendarEventDraft = serde_json::from_str(body)?;
        with_service(conn, |service| Ok(service.add_event(draft)?))
    })
}

pub fn update_event(conn: &Connection, id: &str, body: &str) -> ApiResponse {
    respond("update_event", 200, || {
        let id = parse_id(id)?;
        let draft: CalendarEventDraft = serde_json::from_str(body)?;
        with_service(conn, |service| Ok(service.update_event(id, draft)?))
    })
}

pub fn delete_event(conn: &Connection, id: &str) -> ApiResponse {
    respond("delete_event", 200, || {
        let id = parse_id(id)?;
        with_service(conn, |service| Ok(service.delete_event(id)?))?;
        Ok(json!({ "message": "event deleted", "id": id }))
    })
}

/// `PUT /calendar` with a JSON array of events; replaces the whole calendar.
pub fn replace_events(conn: &Connection, body: &str) -> ApiResponse {
    respond("replace_events", 200, || {
        let events: Vec<CalendarEvent> = serde_json::from_str(body)?;
        let stored = with_service(conn, |service| Ok(service.replace_all(events)?))?;
        Ok(json!({ "data": stored }))
    })
}

/// Seeds the first-run demo slot relative to `now` when the calendar is empty.
pub fn seed_demo(conn: &Connection, now: DateTime<Utc>) -> ApiResponse {
    respond("seed_demo", 200, || {
        let events = with_service(conn, |service| Ok(service.seed_demo_if_empty(now)?))?;
        Ok(json!({ "data": events }))
    })
}
