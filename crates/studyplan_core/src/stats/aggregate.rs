//! Study-time bucketing by day, week, month and year.
//!
//! # Responsibility
//! - Group `TimeRecord`s by the UTC calendar position of `start_time`.
//! - Produce four sorted summary series and per-granularity totals.
//!
//! # Invariants
//! - Records missing `start_time` or `duration_seconds` are excluded.
//! - Every series is sorted ascending by key; keys are unique.
//! - Bucket totals are rounded to 2 decimals (half away from zero).
//! - `aggregate` holds no state between calls.

use crate::model::session::TimeRecord;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use log::debug;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Bucketing resolution of a summary series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
        Granularity::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Field name carrying the bucket key in serialized series.
    pub fn axis_key(self) -> &'static str {
        match self {
            Self::Daily => "date",
            Self::Weekly => "week",
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }

    /// Formats the bucket key for a record starting at `start`.
    ///
    /// - daily: `YYYY-MM-DD`
    /// - weekly: `YYYY-MM-DD` of the Monday opening the week
    /// - monthly: `YYYY-MM`
    /// - yearly: `YYYY`
    pub fn bucket_key(self, start: DateTime<Utc>) -> String {
        let date = start.date_naive();
        match self {
            Self::Daily => format_date(date),
            Self::Weekly => format_date(week_start(date)),
            Self::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            Self::Yearly => format!("{:04}", date.year()),
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a granularity name is not one of `daily|weekly|monthly|yearly`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGranularityError(pub String);

impl Display for ParseGranularityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported granularity `{}`; expected daily|weekly|monthly|yearly",
            self.0
        )
    }
}

impl Error for ParseGranularityError {}

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            other => Err(ParseGranularityError(other.to_string())),
        }
    }
}

/// Monday of the week containing `date`.
///
/// With weekday numbered 0=Sunday..6=Saturday the offset is
/// `(weekday + 6) % 7`, so Sunday steps back six days.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = (date.weekday().num_days_from_sunday() + 6) % 7;
    date.checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(date)
}

fn format_date(date: NaiveDate) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Rounds to 2 decimals, half away from zero.
pub fn round_hours(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Total hours of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub key: String,
    pub total_hours: f64,
}

/// Sorted buckets of one granularity.
///
/// Serializes as `[{ "<axis>": key, "totalHours": n }, ...]` where `<axis>`
/// is `date`, `week`, `month` or `year`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySeries {
    pub granularity: Granularity,
    pub buckets: Vec<BucketSummary>,
}

impl SummarySeries {
    fn from_totals(granularity: Granularity, totals: BTreeMap<String, f64>) -> Self {
        let buckets = totals
            .into_iter()
            .map(|(key, hours)| BucketSummary {
                key,
                total_hours: round_hours(hours),
            })
            .collect();
        Self {
            granularity,
            buckets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Looks up one bucket total by key.
    pub fn hours_for(&self, key: &str) -> Option<f64> {
        self.buckets
            .binary_search_by(|bucket| bucket.key.as_str().cmp(key))
            .ok()
            .map(|idx| self.buckets[idx].total_hours)
    }

    /// Sum of the (already rounded) bucket totals, rounded again.
    pub fn total_hours(&self) -> f64 {
        round_hours(self.buckets.iter().map(|bucket| bucket.total_hours).sum())
    }
}

impl Serialize for SummarySeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let axis = self.granularity.axis_key();
        let mut seq = serializer.serialize_seq(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            seq.serialize_element(&AxisBucket { axis, bucket })?;
        }
        seq.end()
    }
}

struct AxisBucket<'a> {
    axis: &'static str,
    bucket: &'a BucketSummary,
}

impl Serialize for AxisBucket<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.axis, &self.bucket.key)?;
        map.serialize_entry("totalHours", &self.bucket.total_hours)?;
        map.end()
    }
}

/// The four parallel series produced by `aggregate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudySummaries {
    pub daily: SummarySeries,
    pub weekly: SummarySeries,
    pub monthly: SummarySeries,
    pub yearly: SummarySeries,
}

impl StudySummaries {
    pub fn series(&self, granularity: Granularity) -> &SummarySeries {
        match granularity {
            Granularity::Daily => &self.daily,
            Granularity::Weekly => &self.weekly,
            Granularity::Monthly => &self.monthly,
            Granularity::Yearly => &self.yearly,
        }
    }

    /// Total hours of the selected granularity's series.
    ///
    /// Computed on each call from that series only.
    pub fn total_for_period(&self, granularity: Granularity) -> f64 {
        self.series(granularity).total_hours()
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }
}

/// Buckets `records` into daily, weekly, monthly and yearly series.
pub fn aggregate(records: &[TimeRecord]) -> StudySummaries {
    let mut totals: [BTreeMap<String, f64>; 4] = Default::default();
    let mut included = 0usize;

    for record in records {
        let (Some(start), Some(duration)) = (record.start_time, record.duration_seconds) else {
            continue;
        };
        let hours = duration as f64 / SECONDS_PER_HOUR;
        for (granularity, buckets) in Granularity::ALL.iter().zip(totals.iter_mut()) {
            *buckets.entry(granularity.bucket_key(start)).or_insert(0.0) += hours;
        }
        included += 1;
    }

    debug!(
        "event=stats_aggregate module=stats status=ok records={} included={} skipped={}",
        records.len(),
        included,
        records.len() - included
    );

    let [daily, weekly, monthly, yearly] = totals;
    StudySummaries {
        daily: SummarySeries::from_totals(Granularity::Daily, daily),
        weekly: SummarySeries::from_totals(Granularity::Weekly, weekly),
        monthly: SummarySeries::from_totals(Granularity::Monthly, monthly),
        yearly: SummarySeries::from_totals(Granularity::Yearly, yearly),
    }
}
