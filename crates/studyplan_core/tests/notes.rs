use studyplan_core::{
    open_db_in_memory, NoteDraft, NoteRepository, NoteService, PageRequest, RepoError,
    ServiceError, SqliteNoteRepository, ValidationError,
};

fn seed(service: &NoteService<SqliteNoteRepository<'_>>, count: usize) {
    for index in 0..count {
        service
            .create_note(&NoteDraft::new(
                format!("note {index}"),
                format!("body {index}"),
                "19/11/2025",
            ))
            .unwrap();
    }
}

#[test]
fn create_then_get_returns_stored_note() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let created = service
        .create_note(&NoteDraft::new("  Algebra  ", "chapter 3", " 19/11/2025 "))
        .unwrap();
    assert_eq!(created.title, "Algebra");
    assert_eq!(created.date, "19/11/2025");

    let loaded = service.get_note(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn blank_title_or_content_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let err = service
        .create_note(&NoteDraft::new("   ", "body", "today"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankField("title"))
    ));

    let err = service
        .create_note(&NoteDraft::new("title", "", "today"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankField("content"))
    ));
}

#[test]
fn update_replaces_fields_and_missing_note_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let created = service
        .create_note(&NoteDraft::new("draft", "v1", "01/01/2025"))
        .unwrap();

    let updated = service
        .update_note(created.id, &NoteDraft::new("final", "v2", "02/01/2025"))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.content, "v2");
    assert_eq!(updated.created_at, created.created_at);

    let err = service
        .update_note(created.id + 100, &NoteDraft::new("x", "y", "z"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "note", .. }));
}

#[test]
fn list_pages_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    seed(&service, 25);

    let page = service
        .list_notes(PageRequest::new(3, 10).unwrap())
        .unwrap();
    assert_eq!(page.info.total, 25);
    assert_eq!(page.info.total_pages, 3);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].title, "note 4");
    assert_eq!(page.items[4].title, "note 0");

    let first = service.list_notes(PageRequest::default()).unwrap();
    assert_eq!(first.items[0].title, "note 24");
}

#[test]
fn page_past_the_end_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    seed(&service, 3);

    let page = service.list_notes(PageRequest::new(5, 2).unwrap()).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.info.total_pages, 2);
    assert_eq!(page.info.page, 5);
}

#[test]
fn delete_and_delete_all() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    seed(&service, 4);

    let newest = service.list_notes(PageRequest::default()).unwrap().items[0].id;
    service.delete_note(newest).unwrap();
    assert!(matches!(
        repo.delete_note(newest),
        Err(RepoError::NotFound { entity: "note", .. })
    ));

    assert_eq!(service.delete_all_notes().unwrap(), 3);
    assert_eq!(repo.count_notes().unwrap(), 0);
    assert_eq!(service.delete_all_notes().unwrap(), 0);
}

#[test]
fn repository_requires_migrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}
