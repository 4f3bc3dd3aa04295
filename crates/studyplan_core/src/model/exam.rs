//! Exam schedule domain model.
//!
//! # Invariants
//! - `title` and `subject` are non-blank.
//! - `end >= start`.
//! - New exams are not favorites.

use super::{normalize_optional, require_text, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an exam entry.
pub type ExamId = Uuid;

/// One scheduled exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    pub subject: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub room: Option<String>,
    pub note: Option<String>,
    pub favorite: bool,
}

/// Create/update payload for exams. `favorite` is managed separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDraft {
    pub title: String,
    pub subject: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl ExamDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("subject", &self.subject)?;
        if self.end < self.start {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(())
    }

    /// Builds a new exam from this draft with a generated id.
    pub fn into_exam(self) -> Exam {
        self.into_exam_with_id(Uuid::new_v4(), false)
    }

    /// Builds an exam keeping an existing identity and favorite flag.
    pub fn into_exam_with_id(self, id: ExamId, favorite: bool) -> Exam {
        Exam {
            id,
            title: self.title.trim().to_string(),
            subject: self.subject.trim().to_string(),
            start: self.start,
            end: self.end,
            room: normalize_optional(self.room),
            note: normalize_optional(self.note),
            favorite,
        }
    }
}
