//! Calendar (study schedule) use-case service.

use super::{ServiceError, ServiceResult};
use crate::model::calendar::{CalendarEvent, CalendarEventDraft, CalendarEventId};
use crate::repo::calendar_repo::CalendarRepository;
use chrono::{DateTime, Duration, Utc};
use log::info;
use uuid::Uuid;

const DEMO_EVENT_TITLE: &str = "Study session (demo)";

pub struct CalendarService<R: CalendarRepository> {
    repo: R,
}

impl<R: CalendarRepository> CalendarService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_event(&self, draft: CalendarEventDraft) -> ServiceResult<CalendarEvent> {
        draft.validate()?;
        let event = draft.into_event(Uuid::new_v4());
        self.repo.create_event(&event)?;
        Ok(event)
    }

    pub fn update_event(
        &self,
        id: CalendarEventId,
        draft: CalendarEventDraft,
    ) -> ServiceResult<CalendarEvent> {
        draft.validate()?;
        let event = draft.into_event(id);
        self.repo.update_event(&event)?;
        Ok(event)
    }

    pub fn get_event(&self, id: CalendarEventId) -> ServiceResult<CalendarEvent> {
        self.repo.get_event(id)?.ok_or(ServiceError::NotFound {
            entity: "calendar event",
            id: id.to_string(),
        })
    }

    pub fn delete_event(&self, id: CalendarEventId) -> ServiceResult<()> {
        self.repo.delete_event(id)?;
        Ok(())
    }

    pub fn list_events(&self) -> ServiceResult<Vec<CalendarEvent>> {
        Ok(self.repo.list_events()?)
    }

    /// Validates and stores a whole calendar, replacing the previous one.
    pub fn replace_all(&self, events: Vec<CalendarEvent>) -> ServiceResult<Vec<CalendarEvent>> {
        for event in &events {
            event.validate()?;
        }
        self.repo.replace_all_events(&events)?;
        info!(
            "event=calendar_replace module=service status=ok count={}",
            events.len()
        );
        self.list_events()
    }

    /// Stores one demo slot (`now + 1h` to `now + 2h30`) when the calendar
    /// is empty. Returns the full calendar afterwards.
    pub fn seed_demo_if_empty(&self, now: DateTime<Utc>) -> ServiceResult<Vec<CalendarEvent>> {
        let existing = self.list_events()?;
        if !existing.is_empty() {
            return Ok(existing);
        }
        let demo = CalendarEvent {
            id: Uuid::new_v4(),
            title: DEMO_EVENT_TITLE.to_string(),
            start: now + Duration::hours(1),
            end: now + Duration::minutes(150),
        };
        self.replace_all(vec![demo])
    }
}
