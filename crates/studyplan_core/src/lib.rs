//! Core domain logic for StudyPlan.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod paging;
pub mod repo;
pub mod service;
pub mod stats;

pub use config::{ConfigOverrides, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::calendar::{CalendarEvent, CalendarEventDraft, CalendarEventId};
pub use model::exam::{Exam, ExamDraft, ExamId};
pub use model::note::{Note, NoteDraft, NoteId};
pub use model::session::{RecordRange, SessionId, StudySession, StudySessionDraft, TimeRecord};
pub use model::view_state::{ViewState, STATS_VIEW_KEY};
pub use model::ValidationError;
pub use paging::{paginate, PageInfo, PageRequest, PageResult, Pagination, PaginationError};
pub use repo::calendar_repo::{CalendarRepository, SqliteCalendarRepository};
pub use repo::exam_repo::{ExamRepository, SqliteExamRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository};
pub use repo::view_state_repo::{MemoryViewStateStore, SqliteViewStateStore, ViewStateStore};
pub use repo::{RepoError, RepoResult};
pub use service::calendar_service::CalendarService;
pub use service::exam_service::ExamService;
pub use service::note_service::NoteService;
pub use service::session_service::SessionService;
pub use service::stats_service::StatsService;
pub use service::{ServiceError, ServiceResult};
pub use stats::{
    aggregate, format_duration_hms, BucketSummary, Granularity, ParseGranularityError,
    RecordDetail, StatsReport, StudySummaries, SummarySeries,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
