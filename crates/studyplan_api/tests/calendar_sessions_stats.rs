use chrono::{TimeZone, Utc};
use serde_json::json;
use studyplan_api::{calendar, sessions, stats};
use studyplan_core::open_db_in_memory;

#[test]
fn calendar_seed_replace_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let now = Utc.with_ymd_and_hms(2025, 11, 20, 8, 0, 0).unwrap();

    let seeded = calendar::seed_demo(&conn, now).json().unwrap();
    assert_eq!(seeded["data"].as_array().unwrap().len(), 1);
    assert_eq!(seeded["data"][0]["start"], "2025-11-20T09:00:00Z");
    assert_eq!(seeded["data"][0]["end"], "2025-11-20T10:30:00Z");

    let replacement = json!([
        {
            "id": "6a0e8f2c-4a55-4f3f-9d4e-1f1f0c0c0c01",
            "title": "Math",
            "start": "2025-11-21T13:00:00Z",
            "end": "2025-11-21T15:00:00Z"
        },
        {
            "id": "6a0e8f2c-4a55-4f3f-9d4e-1f1f0c0c0c02",
            "title": "Biology",
            "start": "2025-11-21T08:00:00Z",
            "end": "2025-11-21T09:00:00Z"
        }
    ]);
    let replaced = calendar::replace_events(&conn, &replacement.to_string());
    assert_eq!(replaced.status, 200, "{}", replaced.body);
    let listed = calendar::list_events(&conn).json().unwrap();
    assert_eq!(listed["data"][0]["title"], "Biology");
    assert_eq!(listed["data"][1]["title"], "Math");

    let removed = calendar::delete_event(&conn, "6a0e8f2c-4a55-4f3f-9d4e-1f1f0c0c0c01");
    assert_eq!(removed.status, 200);
    assert_eq!(
        calendar::list_events(&conn).json().unwrap()["data"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn calendar_rejects_reversed_slot() {
    let conn = open_db_in_memory().unwrap();
    let body = json!({
        "title": "broken",
        "start": "2025-11-21T10:00:00Z",
        "end": "2025-11-21T09:00:00Z"
    });
    assert_eq!(calendar::add_event(&conn, &body.to_string()).status, 400);
    assert_eq!(
        calendar::update_event(&conn, "bad-id", &body.to_string()).status,
        400
    );
}

#[test]
fn sessions_feed_stats_summaries() {
    let conn = open_db_in_memory().unwrap();
    for body in [
        json!({ "startTime": "2025-11-20T09:00:00Z", "duration": 3600 }),
        json!({ "startTime": "2025-11-20T14:00:00Z", "endTime": "2025-11-20T16:30:00Z" }),
        json!({ "startTime": "2025-11-21T10:00:00Z", "duration": 10800, "subject": "Math" }),
    ] {
        let response = sessions::record_session(&conn, &body.to_string());
        assert_eq!(response.status, 201, "{}", response.body);
    }

    let summaries = stats::summaries(&conn, None, None).json().unwrap();
    assert_eq!(
        summaries["daily"],
        json!([
            { "date": "2025-11-20", "totalHours": 3.5 },
            { "date": "2025-11-21", "totalHours": 3.0 }
        ])
    );
    assert_eq!(
        summaries["weekly"],
        json!([{ "week": "2025-11-17", "totalHours": 6.5 }])
    );
    assert_eq!(summaries["yearly"][0]["year"], "2025");

    let bounded = stats::summaries(&conn, Some("2025-11-21T00:00:00Z"), None)
        .json()
        .unwrap();
    assert_eq!(bounded["daily"].as_array().unwrap().len(), 1);

    assert_eq!(stats::summaries(&conn, Some("yesterday"), None).status, 400);

    let page = sessions::list_sessions(&conn, Some("1"), Some("2")).json().unwrap();
    assert_eq!(page["extraInfo"]["totalPages"], 2);
    assert_eq!(page["data"][0]["startTime"], "2025-11-21T10:00:00Z");
}

#[test]
fn report_uses_stored_granularity_until_overridden() {
    let conn = open_db_in_memory().unwrap();
    sessions::record_session(
        &conn,
        r#"{ "startTime": "2025-11-20T09:00:00Z", "duration": 5400 }"#,
    );

    let default_report = stats::report(&conn, None, None, None).json().unwrap();
    assert_eq!(default_report["granularity"], "daily");
    assert_eq!(default_report["series"][0]["date"], "2025-11-20");
    assert_eq!(default_report["records"][0]["duration"], "01:30:00");

    let selected = stats::select_granularity(&conn, "Monthly");
    assert_eq!(selected.json().unwrap(), json!({ "granularity": "monthly" }));
    assert_eq!(
        stats::view_state(&conn).json().unwrap()["granularity"],
        "monthly"
    );

    let stored = stats::report(&conn, None, None, None).json().unwrap();
    assert_eq!(stored["axis"], "month");
    assert_eq!(stored["totalHours"], 1.5);

    let explicit = stats::report(&conn, Some("yearly"), None, None).json().unwrap();
    assert_eq!(explicit["series"][0]["year"], "2025");

    assert_eq!(stats::select_granularity(&conn, "hourly").status, 400);
    assert_eq!(stats::report(&conn, Some("hourly"), None, None).status, 400);
}

#[test]
fn aggregate_records_skips_incomplete_entries() {
    let body = json!([
        { "startTime": "2025-11-20T09:00:00Z", "duration": 3600 },
        { "startTime": "2025-11-20T10:00:00Z", "duration": null },
        { "duration": 7200 },
        { "startTime": "2025-11-23T10:00:00Z", "endTime": null, "duration": 1800 }
    ]);

    let response = stats::aggregate_records(&body.to_string());
    assert_eq!(response.status, 200);
    let summaries = response.json().unwrap();
    assert_eq!(summaries["daily"].as_array().unwrap().len(), 2);
    assert_eq!(
        summaries["weekly"],
        json!([{ "week": "2025-11-17", "totalHours": 1.5 }])
    );

    assert_eq!(stats::aggregate_records("[{]").status, 400);
    let empty = stats::aggregate_records("[]").json().unwrap();
    assert_eq!(empty["monthly"], json!([]));
}
