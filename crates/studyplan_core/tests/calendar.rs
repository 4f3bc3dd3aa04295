use chrono::{Duration, TimeZone, Utc};
use studyplan_core::{
    open_db_in_memory, CalendarEvent, CalendarEventDraft, CalendarService, ServiceError,
    SqliteCalendarRepository, ValidationError,
};
use uuid::Uuid;

fn slot(title: &str, start_hour: u32, end_hour: u32) -> CalendarEventDraft {
    CalendarEventDraft {
        title: title.to_string(),
        start: Utc.with_ymd_and_hms(2025, 11, 24, start_hour, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 11, 24, end_hour, 0, 0).unwrap(),
    }
}

#[test]
fn events_list_in_start_order() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());

    service.add_event(slot("late", 18, 19)).unwrap();
    service.add_event(slot("early", 8, 9)).unwrap();

    let titles: Vec<_> = service
        .list_events()
        .unwrap()
        .into_iter()
        .map(|event| event.title)
        .collect();
    assert_eq!(titles, vec!["early", "late"]);
}

#[test]
fn update_and_delete_require_existing_event() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let event = service.add_event(slot("review", 10, 11)).unwrap();

    let moved = service
        .update_event(event.id, slot("review", 14, 16))
        .unwrap();
    assert_eq!(service.get_event(event.id).unwrap(), moved);

    service.delete_event(event.id).unwrap();
    let err = service.delete_event(event.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
    let err = service
        .update_event(Uuid::new_v4(), slot("ghost", 1, 2))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test]
fn invalid_slots_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());

    let err = service.add_event(slot("backwards", 12, 11)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EndBeforeStart)
    ));
    let err = service.add_event(slot("", 1, 2)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankField("title"))
    ));
}

#[test]
fn replace_all_swaps_whole_calendar() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    service.add_event(slot("old", 8, 9)).unwrap();

    let replacement = vec![
        slot("b", 12, 13).into_event(Uuid::new_v4()),
        slot("a", 9, 10).into_event(Uuid::new_v4()),
    ];
    let stored = service.replace_all(replacement).unwrap();
    let titles: Vec<_> = stored.iter().map(|event| event.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b"]);
}

#[test]
fn invalid_replacement_keeps_previous_calendar() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let kept = service.add_event(slot("kept", 8, 9)).unwrap();

    let broken = CalendarEvent {
        id: Uuid::new_v4(),
        title: "broken".to_string(),
        start: kept.end,
        end: kept.start,
    };
    assert!(service.replace_all(vec![broken]).is_err());
    assert_eq!(service.list_events().unwrap(), vec![kept]);
}

#[test]
fn demo_slot_is_seeded_only_once() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let now = Utc.with_ymd_and_hms(2025, 11, 20, 9, 0, 0).unwrap();

    let seeded = service.seed_demo_if_empty(now).unwrap();
    assert_eq!(seeded.len(), 1);
    assert_eq!(seeded[0].start, now + Duration::hours(1));
    assert_eq!(seeded[0].end, now + Duration::minutes(150));

    let again = service.seed_demo_if_empty(now + Duration::days(1)).unwrap();
    assert_eq!(again, seeded);
}
