//! Study session use-case service.
//!
//! # Invariants
//! - A missing duration is derived from `end - start` when the end is known.
//! - Durations (including negative ones) are otherwise stored as given.

use super::{ServiceError, ServiceResult};
use crate::model::normalize_optional;
use crate::model::session::{SessionId, StudySession, StudySessionDraft};
use crate::paging::{PageRequest, PageResult};
use crate::repo::session_repo::SessionRepository;
use log::info;

pub struct SessionService<R: SessionRepository> {
    repo: R,
}

impl<R: SessionRepository> SessionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a study session and returns the persisted row.
    pub fn record_session(&self, draft: StudySessionDraft) -> ServiceResult<StudySession> {
        let draft = StudySessionDraft {
            duration_seconds: draft.effective_duration(),
            subject: normalize_optional(draft.subject),
            note: normalize_optional(draft.note),
            ..draft
        };
        let id = self.repo.create_session(&draft)?;
        info!(
            "event=session_record module=service status=ok session_id={} duration_s={}",
            id,
            draft
                .duration_seconds
                .map_or_else(|| "none".to_string(), |value| value.to_string())
        );
        self.repo
            .get_session(id)?
            .ok_or(ServiceError::InconsistentState(
                "recorded session not found in read-back",
            ))
    }

    pub fn get_session(&self, id: SessionId) -> ServiceResult<StudySession> {
        self.repo.get_session(id)?.ok_or(ServiceError::NotFound {
            entity: "study session",
            id: id.to_string(),
        })
    }

    pub fn delete_session(&self, id: SessionId) -> ServiceResult<()> {
        self.repo.delete_session(id)?;
        Ok(())
    }

    pub fn list_sessions(&self, request: PageRequest) -> ServiceResult<PageResult<StudySession>> {
        let total = self.repo.count_sessions()?;
        let window = request.window(total);
        let items = self.repo.list_sessions(&window)?;
        Ok(PageResult::new(items, total, request))
    }
}
