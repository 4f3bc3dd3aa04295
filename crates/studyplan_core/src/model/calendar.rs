//! Calendar slot model for the study schedule view.

use super::{require_text, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CalendarEventId = Uuid;

/// A scheduled study slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: CalendarEventId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventDraft {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarEventDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        if self.end < self.start {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(())
    }

    pub fn into_event(self, id: CalendarEventId) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title.trim().to_string(),
            start: self.start,
            end: self.end,
        }
    }
}

impl CalendarEvent {
    /// Validates a fully-formed event, as accepted by bulk replacement.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        if self.end < self.start {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(())
    }
}
