//! Study session records.
//!
//! # Responsibility
//! - Define `TimeRecord`, the loosely-populated input of aggregation.
//! - Define the persisted `StudySession` and its create payload.
//!
//! # Invariants
//! - A `TimeRecord` without `start_time` or `duration_seconds` contributes
//!   nothing to statistics.
//! - Durations are stored as given; negative values are not rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type SessionId = i64;

/// One time-stamped study record as seen by aggregation.
///
/// JSON shape: `{ startTime, endTime, duration, subject, note }` where any
/// field may be `null` or missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Length in seconds.
    #[serde(rename = "duration", alias = "durationSeconds")]
    pub duration_seconds: Option<i64>,
    pub subject: Option<String>,
    pub note: Option<String>,
}

impl TimeRecord {
    /// Convenience constructor for a complete record.
    pub fn new(start_time: DateTime<Utc>, duration_seconds: i64) -> Self {
        Self {
            start_time: Some(start_time),
            duration_seconds: Some(duration_seconds),
            ..Self::default()
        }
    }

    /// Whether the record is still running (no end and no duration yet).
    pub fn is_in_progress(&self) -> bool {
        self.end_time.is_none() && self.duration_seconds.is_none()
    }
}

/// Persisted study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: SessionId,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "duration")]
    pub duration_seconds: Option<i64>,
    pub subject: Option<String>,
    pub note: Option<String>,
}

impl StudySession {
    /// Whether the session is still running (no end and no duration yet).
    pub fn is_in_progress(&self) -> bool {
        self.end_time.is_none() && self.duration_seconds.is_none()
    }

    pub fn to_record(&self) -> TimeRecord {
        TimeRecord {
            start_time: Some(self.start_time),
            end_time: self.end_time,
            duration_seconds: self.duration_seconds,
            subject: self.subject.clone(),
            note: self.note.clone(),
        }
    }
}

/// Create payload for a study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySessionDraft {
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, rename = "duration")]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl StudySessionDraft {
    pub fn starting_at(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: None,
            duration_seconds: None,
            subject: None,
            note: None,
        }
    }

    /// Returns the explicit duration, or `end - start` when only the end is
    /// known.
    pub fn effective_duration(&self) -> Option<i64> {
        self.duration_seconds.or_else(|| {
            self.end_time
                .map(|end| end.signed_duration_since(self.start_time).num_seconds())
        })
    }
}

/// Half-open `[from, to)` filter on session start time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl RecordRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }
}
