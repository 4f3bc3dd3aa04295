//! Study statistics.
//!
//! # Responsibility
//! - Bucket study records into daily/weekly/monthly/yearly series.
//! - Build presentation-ready reports for one selected granularity.
//!
//! # Invariants
//! - Everything here is pure; records are read, never mutated.

pub mod aggregate;
pub mod report;

pub use aggregate::{
    aggregate, round_hours, week_start, BucketSummary, Granularity, ParseGranularityError,
    StudySummaries, SummarySeries,
};
pub use report::{format_duration_hms, RecordDetail, StatsReport};
