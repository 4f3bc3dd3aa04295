//! Presentation projection of study statistics.

use super::aggregate::{Granularity, StudySummaries, SummarySeries};
use crate::model::session::TimeRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Statistics for one selected granularity plus the detailed record list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub granularity: Granularity,
    /// Name of the key field in `series` entries.
    pub axis: &'static str,
    pub series: SummarySeries,
    /// Total hours over `series`, rounded to 2 decimals.
    pub total_hours: f64,
    pub records: Vec<RecordDetail>,
}

impl StatsReport {
    pub fn build(
        granularity: Granularity,
        summaries: &StudySummaries,
        records: &[TimeRecord],
    ) -> Self {
        Self {
            granularity,
            axis: granularity.axis_key(),
            series: summaries.series(granularity).clone(),
            total_hours: summaries.total_for_period(granularity),
            records: records.iter().map(RecordDetail::from_record).collect(),
        }
    }
}

/// One row of the detailed record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// `true` when the record has neither an end nor a duration.
    pub in_progress: bool,
    /// `HH:MM:SS`, absent when the record carries no duration.
    pub duration: Option<String>,
    pub subject: Option<String>,
    pub note: Option<String>,
}

impl RecordDetail {
    pub fn from_record(record: &TimeRecord) -> Self {
        Self {
            start_time: record.start_time,
            end_time: record.end_time,
            in_progress: record.is_in_progress(),
            duration: record.duration_seconds.map(format_duration_hms),
            subject: record.subject.clone(),
            note: record.note.clone(),
        }
    }
}

/// Formats seconds as zero-padded `HH:MM:SS`. Negative input yields `00:00:00`.
pub fn format_duration_hms(seconds: i64) -> String {
    if seconds < 0 {
        return "00:00:00".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
