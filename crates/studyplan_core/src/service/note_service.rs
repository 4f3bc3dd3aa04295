//! Note use-case service.
//!
//! # Invariants
//! - `title` and `content` are required; `date` is stored verbatim.
//! - Listing is paged, newest first.

use super::{ServiceError, ServiceResult};
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::paging::{PageRequest, PageResult};
use crate::repo::note_repo::NoteRepository;
use log::info;

pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note and returns the stored row.
    pub fn create_note(&self, draft: &NoteDraft) -> ServiceResult<Note> {
        draft.validate()?;
        let id = self.repo.create_note(draft)?;
        info!("event=note_create module=service status=ok note_id={id}");
        self.repo
            .get_note(id)?
            .ok_or(ServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces title, content and date of an existing note.
    pub fn update_note(&self, id: NoteId, draft: &NoteDraft) -> ServiceResult<Note> {
        draft.validate()?;
        self.repo.update_note(id, draft)?;
        self.repo
            .get_note(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    pub fn get_note(&self, id: NoteId) -> ServiceResult<Note> {
        self.repo.get_note(id)?.ok_or(ServiceError::NotFound {
            entity: "note",
            id: id.to_string(),
        })
    }

    pub fn delete_note(&self, id: NoteId) -> ServiceResult<()> {
        self.repo.delete_note(id)?;
        Ok(())
    }

    /// Deletes every note; returns how many were removed.
    pub fn delete_all_notes(&self) -> ServiceResult<usize> {
        let deleted = self.repo.delete_all_notes()?;
        info!("event=note_delete_all module=service status=ok deleted={deleted}");
        Ok(deleted)
    }

    pub fn list_notes(&self, request: PageRequest) -> ServiceResult<PageResult<Note>> {
        let total = self.repo.count_notes()?;
        let window = request.window(total);
        let items = self.repo.list_notes(&window)?;
        Ok(PageResult::new(items, total, request))
    }
}
