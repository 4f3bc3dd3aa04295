//! Exam schedule use-case service.
//!
//! # Invariants
//! - Updates keep the exam's id and favorite flag.
//! - A blank subject filter means "all subjects".
//! - Demo exams are only stored into an empty schedule.

use super::{ServiceError, ServiceResult};
use crate::model::exam::{Exam, ExamDraft, ExamId};
use crate::paging::{PageRequest, PageResult};
use crate::repo::exam_repo::ExamRepository;
use chrono::{DateTime, Duration, Utc};
use log::info;
use uuid::Uuid;

pub struct ExamService<R: ExamRepository> {
    repo: R,
}

impl<R: ExamRepository> ExamService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_exam(&self, draft: ExamDraft) -> ServiceResult<Exam> {
        draft.validate()?;
        let exam = draft.into_exam();
        self.repo.create_exam(&exam)?;
        info!(
            "event=exam_create module=service status=ok exam_id={}",
            exam.id
        );
        Ok(exam)
    }

    pub fn update_exam(&self, id: ExamId, draft: ExamDraft) -> ServiceResult<Exam> {
        draft.validate()?;
        let current = self.get_exam(id)?;
        let exam = draft.into_exam_with_id(id, current.favorite);
        self.repo.update_exam(&exam)?;
        Ok(exam)
    }

    pub fn get_exam(&self, id: ExamId) -> ServiceResult<Exam> {
        self.repo.get_exam(id)?.ok_or(ServiceError::NotFound {
            entity: "exam",
            id: id.to_string(),
        })
    }

    pub fn delete_exam(&self, id: ExamId) -> ServiceResult<()> {
        self.repo.delete_exam(id)?;
        Ok(())
    }

    /// Flips the favorite flag and returns the updated exam.
    pub fn toggle_favorite(&self, id: ExamId) -> ServiceResult<Exam> {
        self.repo.toggle_favorite(id)?;
        self.get_exam(id)
    }

    pub fn list_exams(
        &self,
        subject: Option<&str>,
        request: PageRequest,
    ) -> ServiceResult<PageResult<Exam>> {
        let subject = subject.map(str::trim).filter(|value| !value.is_empty());
        let total = self.repo.count_exams(subject)?;
        let window = request.window(total);
        let items = self.repo.list_exams(subject, &window)?;
        Ok(PageResult::new(items, total, request))
    }

    pub fn subjects(&self) -> ServiceResult<Vec<String>> {
        Ok(self.repo.list_subjects()?)
    }

    /// Stores the two first-run demo exams when the schedule is empty:
    /// an upcoming one tomorrow and a past favorite three days ago.
    /// Returns the exams that were stored, empty when nothing was seeded.
    pub fn seed_demo_if_empty(&self, now: DateTime<Utc>) -> ServiceResult<Vec<Exam>> {
        if self.repo.count_exams(None)? > 0 {
            return Ok(Vec::new());
        }
        let demo = vec![
            demo_exam(
                "Final exam A",
                "Object-oriented programming",
                now + Duration::days(1),
                "Room 101",
                "Bring student ID",
                false,
            ),
            demo_exam(
                "Midterm B",
                ".NET application programming",
                now - Duration::days(3),
                "Room 202",
                "Assignment submitted",
                true,
            ),
        ];
        for exam in &demo {
            self.repo.create_exam(exam)?;
        }
        info!(
            "event=exam_seed module=service status=ok count={}",
            demo.len()
        );
        Ok(demo)
    }
}

fn demo_exam(
    title: &str,
    subject: &str,
    start: DateTime<Utc>,
    room: &str,
    note: &str,
    favorite: bool,
) -> Exam {
    Exam {
        id: Uuid::new_v4(),
        title: title.to_string(),
        subject: subject.to_string(),
        start,
        end: start + Duration::hours(2),
        room: Some(room.to_string()),
        note: Some(note.to_string()),
        favorite,
    }
}
