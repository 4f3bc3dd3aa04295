//! Calendar slot repository contract and SQLite implementation.
//!
//! # Invariants
//! - Lists are ordered by `start ASC`, ties by id.
//! - `replace_all_events` swaps the whole calendar in one transaction.

use super::{ensure_tables, from_epoch_ms, parse_uuid, to_epoch_ms, RepoError, RepoResult};
use crate::model::calendar::{CalendarEvent, CalendarEventId};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const EVENT_SELECT_SQL: &str = "SELECT uuid, title, start_at, end_at FROM calendar_events";

pub trait CalendarRepository {
    fn create_event(&self, event: &CalendarEvent) -> RepoResult<CalendarEventId>;
    fn update_event(&self, event: &CalendarEvent) -> RepoResult<()>;
    fn get_event(&self, id: CalendarEventId) -> RepoResult<Option<CalendarEvent>>;
    fn delete_event(&self, id: CalendarEventId) -> RepoResult<()>;
    fn list_events(&self) -> RepoResult<Vec<CalendarEvent>>;
    /// Replaces every stored event with `events`.
    fn replace_all_events(&self, events: &[CalendarEvent]) -> RepoResult<()>;
}

pub struct SqliteCalendarRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCalendarRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["calendar_events"])?;
        Ok(Self { conn })
    }
}

impl CalendarRepository for SqliteCalendarRepository<'_> {
    fn create_event(&self, event: &CalendarEvent) -> RepoResult<CalendarEventId> {
        insert_event(self.conn, event)?;
        Ok(event.id)
    }

    fn update_event(&self, event: &CalendarEvent) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE calendar_events
             SET title = ?2, start_at = ?3, end_at = ?4
             WHERE uuid = ?1;",
            params![
                event.id.to_string(),
                event.title.as_str(),
                to_epoch_ms(event.start),
                to_epoch_ms(event.end),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("calendar event", event.id));
        }
        Ok(())
    }

    fn get_event(&self, id: CalendarEventId) -> RepoResult<Option<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn delete_event(&self, id: CalendarEventId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM calendar_events WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("calendar event", id));
        }
        Ok(())
    }

    fn list_events(&self) -> RepoResult<Vec<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY start_at ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn replace_all_events(&self, events: &[CalendarEvent]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM calendar_events;", [])?;
        for event in events {
            insert_event(&tx, event)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn insert_event(conn: &Connection, event: &CalendarEvent) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO calendar_events (uuid, title, start_at, end_at) VALUES (?1, ?2, ?3, ?4);",
        params![
            event.id.to_string(),
            event.title.as_str(),
            to_epoch_ms(event.start),
            to_epoch_ms(event.end),
        ],
    )?;
    Ok(())
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<CalendarEvent> {
    let uuid_text: String = row.get("uuid")?;
    Ok(CalendarEvent {
        id: parse_uuid("calendar_events.uuid", &uuid_text)?,
        title: row.get("title")?,
        start: from_epoch_ms("calendar_events.start_at", row.get("start_at")?)?,
        end: from_epoch_ms("calendar_events.end_at", row.get("end_at")?)?,
    })
}
