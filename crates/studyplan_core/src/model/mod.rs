//! Domain model for notes, exam schedules, calendar slots and study sessions.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and the API.
//! - Validate user-supplied drafts before they reach persistence.
//!
//! # Invariants
//! - Title-like fields are never blank after validation.
//! - Ranged entries (exams, calendar slots) never end before they start.

pub mod calendar;
pub mod exam;
pub mod note;
pub mod session;
pub mod view_state;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for user-supplied drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    BlankField(&'static str),
    /// `end` is earlier than `start`.
    EndBeforeStart,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::EndBeforeStart => write!(f, "end time must not be earlier than start time"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

/// Normalizes optional free text: blank values become `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
