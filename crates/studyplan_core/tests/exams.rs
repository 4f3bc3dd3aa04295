use chrono::{DateTime, Duration, TimeZone, Utc};
use studyplan_core::{
    open_db_in_memory, ExamDraft, ExamService, PageRequest, ServiceError, SqliteExamRepository,
    ValidationError,
};
use uuid::Uuid;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, day, hour, 0, 0).unwrap()
}

fn draft(title: &str, subject: &str) -> ExamDraft {
    ExamDraft {
        title: title.to_string(),
        subject: subject.to_string(),
        start: at(10, 9),
        end: at(10, 11),
        room: Some("  B-204 ".to_string()),
        note: Some("   ".to_string()),
    }
}

#[test]
fn create_normalizes_optional_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = ExamService::new(SqliteExamRepository::try_new(&conn).unwrap());

    let exam = service.create_exam(draft("Final", "Physics")).unwrap();
    assert!(!exam.favorite);
    assert_eq!(exam.room.as_deref(), Some("B-204"));
    assert_eq!(exam.note, None);

    assert_eq!(service.get_exam(exam.id).unwrap(), exam);
}

#[test]
fn invalid_drafts_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = ExamService::new(SqliteExamRepository::try_new(&conn).unwrap());

    let err = service.create_exam(draft("Final", " ")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankField("subject"))
    ));

    let mut backwards = draft("Final", "Physics");
    backwards.end = backwards.start - Duration::minutes(1);
    let err = service.create_exam(backwards).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EndBeforeStart)
    ));
}

#[test]
fn toggle_favorite_flips_and_update_preserves_it() {
    let conn = open_db_in_memory().unwrap();
    let service = ExamService::new(SqliteExamRepository::try_new(&conn).unwrap());
    let exam = service.create_exam(draft("Midterm", "Math")).unwrap();

    assert!(service.toggle_favorite(exam.id).unwrap().favorite);

    let mut changed = draft("Midterm (moved)", "Math");
    changed.start = at(12, 9);
    changed.end = at(12, 10);
    let updated = service.update_exam(exam.id, changed).unwrap();
    assert!(updated.favorite);
    assert_eq!(updated.title, "Midterm (moved)");
    assert_eq!(service.get_exam(exam.id).unwrap().start, at(12, 9));

    assert!(!service.toggle_favorite(exam.id).unwrap().favorite);
}

#[test]
fn missing_exam_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ExamService::new(SqliteExamRepository::try_new(&conn).unwrap());
    let unknown = Uuid::new_v4();

    for err in [
        service.get_exam(unknown).unwrap_err(),
        service.delete_exam(unknown).unwrap_err(),
        service.toggle_favorite(unknown).unwrap_err(),
        service.update_exam(unknown, draft("x", "y")).unwrap_err(),
    ] {
        assert!(matches!(err, ServiceError::NotFound { entity: "exam", .. }));
    }
}

#[test]
fn list_filters_by_subject_and_pages_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service = ExamService::new(SqliteExamRepository::try_new(&conn).unwrap());
    for index in 0..5 {
        service
            .create_exam(draft(&format!("math {index}"), "Math"))
            .unwrap();
    }
    service.create_exam(draft("lab", "chemistry")).unwrap();

    let all = service
        .list_exams(None, PageRequest::new(1, 4).unwrap())
        .unwrap();
    assert_eq!(all.info.total, 6);
    assert_eq!(all.info.total_pages, 2);
    assert_eq!(all.items[0].title, "lab");

    let math = service
        .list_exams(Some("Math"), PageRequest::new(2, 2).unwrap())
        .unwrap();
    assert_eq!(math.info.total, 5);
    assert_eq!(math.info.total_pages, 3);
    let titles: Vec<_> = math.items.iter().map(|exam| exam.title.as_str()).collect();
    assert_eq!(titles, vec!["math 2", "math 1"]);

    let blank = service
        .list_exams(Some("  "), PageRequest::default())
        .unwrap();
    assert_eq!(blank.info.total, 6);
}

#[test]
fn subjects_are_distinct_and_sorted() {
    let conn = open_db_in_memory().unwrap();
    let service = ExamService::new(SqliteExamRepository::try_new(&conn).unwrap());
    for subject in ["physics", "Math", "chemistry", "Math"] {
        service.create_exam(draft("exam", subject)).unwrap();
    }

    assert_eq!(
        service.subjects().unwrap(),
        vec!["chemistry", "Math", "physics"]
    );
}

#[test]
fn demo_exams_are_seeded_only_once() {
    let conn = open_db_in_memory().unwrap();
    let service = ExamService::new(SqliteExamRepository::try_new(&conn).unwrap());
    let now = at(15, 8);

    let seeded = service.seed_demo_if_empty(now).unwrap();
    assert_eq!(seeded.len(), 2);
    assert_eq!(seeded[0].start, now + Duration::days(1));
    assert!(!seeded[0].favorite);
    assert_eq!(seeded[1].start, now - Duration::days(3));
    assert_eq!(seeded[1].end, seeded[1].start + Duration::hours(2));
    assert!(seeded[1].favorite);
    assert_eq!(seeded[1].room.as_deref(), Some("Room 202"));
    assert_eq!(service.get_exam(seeded[1].id).unwrap(), seeded[1]);

    let again = service.seed_demo_if_empty(now + Duration::days(1)).unwrap();
    assert!(again.is_empty());
    let page = service.list_exams(None, PageRequest::default()).unwrap();
    assert_eq!(page.info.total, 2);
}

#[test]
fn demo_exams_skip_non_empty_schedule() {
    let conn = open_db_in_memory().unwrap();
    let service = ExamService::new(SqliteExamRepository::try_new(&conn).unwrap());
    service.create_exam(draft("Final", "Physics")).unwrap();

    assert!(service.seed_demo_if_empty(at(15, 8)).unwrap().is_empty());
    let page = service.list_exams(None, PageRequest::default()).unwrap();
    assert_eq!(page.info.total, 1);
}
