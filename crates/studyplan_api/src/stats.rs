//! Statistics endpoints.
//!
//! # Responsibility
//! - Serve the four summary series and the per-granularity report.
//! - Persist the selected granularity between calls.
//!
//! # Invariants
//! - Range bounds are RFC 3339 timestamps, `from` inclusive, `to` exclusive.
//! - A report without an explicit granularity uses the stored view state.

use crate::response::{respond, ApiError, ApiResponse};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use studyplan_core::{
    aggregate, Granularity, RecordRange, SqliteSessionRepository, SqliteViewStateStore,
    StatsService, TimeRecord,
};

type SqliteStatsService<'conn> =
    StatsService<SqliteSessionRepository<'conn>, SqliteViewStateStore<'conn>>;

fn service(conn: &Connection) -> Result<SqliteStatsService<'_>, ApiError> {
    Ok(StatsService::new(
        SqliteSessionRepository::try_new(conn)?,
        SqliteViewStateStore::try_new(conn)?,
    ))
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| Some(parsed.with_timezone(&Utc)))
        .map_err(|err| ApiError::bad_request(format!("invalid `{name}` timestamp `{value}`: {err}")))
}

fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<RecordRange, ApiError> {
    Ok(RecordRange {
        from: parse_bound("from", from)?,
        to: parse_bound("to", to)?,
    })
}

/// `GET /stats/summaries?from=&to=` → `{ daily, weekly, monthly, yearly }`.
pub fn summaries(conn: &Connection, from: Option<&str>, to: Option<&str>) -> ApiResponse {
    respond("stats_summaries", 200, || {
        let range = parse_range(from, to)?;
        Ok(service(conn)?.summaries(&range)?)
    })
}

/// `GET /stats/report?granularity=&from=&to=`.
pub fn report(
    conn: &Connection,
    granularity: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> ApiResponse {
    respond("stats_report", 200, || {
        let range = parse_range(from, to)?;
        let stats = service(conn)?;
        let granularity = match granularity.map(str::trim).filter(|value| !value.is_empty()) {
            Some(raw) => raw.parse::<Granularity>()?,
            None => stats.load_view_state()?.granularity,
        };
        Ok(stats.report(granularity, &range)?)
    })
}

/// `GET /stats/view` → `{ granularity }`.
pub fn view_state(conn: &Connection) -> ApiResponse {
    respond("stats_view_state", 200, || {
        Ok(service(conn)?.load_view_state()?)
    })
}

/// `PUT /stats/view` with a granularity name; returns the new view state.
pub fn select_granularity(conn: &Connection, granularity: &str) -> ApiResponse {
    respond("stats_select_granularity", 200, || {
        let granularity = granularity.parse::<Granularity>()?;
        let stats = service(conn)?;
        let current = stats.load_view_state()?;
        Ok(stats.select_granularity(current, granularity)?)
    })
}

/// Aggregates a JSON array of time records without touching storage.
pub fn aggregate_records(body: &str) -> ApiResponse {
    respond("stats_aggregate", 200, || {
        let records: Vec<TimeRecord> = serde_json::from_str(body)?;
        Ok(aggregate(&records))
    })
}
