//! Statistics use-case service.
//!
//! # Responsibility
//! - Feed stored study sessions into the aggregator.
//! - Load and persist the selected granularity through a `ViewStateStore`.
//!
//! # Invariants
//! - View state is passed in and returned; the service keeps no copy.
//! - Unreadable stored state falls back to `ViewState::default()`.

use super::{ServiceError, ServiceResult};
use crate::model::session::RecordRange;
use crate::model::view_state::{ViewState, STATS_VIEW_KEY};
use crate::repo::session_repo::SessionRepository;
use crate::repo::view_state_repo::ViewStateStore;
use crate::stats::{aggregate, Granularity, StatsReport, StudySummaries};
use log::{info, warn};

pub struct StatsService<R: SessionRepository, S: ViewStateStore> {
    sessions: R,
    store: S,
}

impl<R: SessionRepository, S: ViewStateStore> StatsService<R, S> {
    pub fn new(sessions: R, store: S) -> Self {
        Self { sessions, store }
    }

    /// Aggregates every stored session starting inside `range`.
    pub fn summaries(&self, range: &RecordRange) -> ServiceResult<StudySummaries> {
        let records = self.sessions.list_records(range)?;
        Ok(aggregate(&records))
    }

    /// Builds the report for `granularity` over sessions inside `range`.
    pub fn report(
        &self,
        granularity: Granularity,
        range: &RecordRange,
    ) -> ServiceResult<StatsReport> {
        let records = self.sessions.list_records(range)?;
        let summaries = aggregate(&records);
        let report = StatsReport::build(granularity, &summaries, &records);
        info!(
            "event=stats_report module=service status=ok granularity={} buckets={} total_hours={}",
            granularity,
            report.series.len(),
            report.total_hours
        );
        Ok(report)
    }

    /// Reads the persisted view state.
    pub fn load_view_state(&self) -> ServiceResult<ViewState> {
        let Some(raw) = self.store.load_state(STATS_VIEW_KEY)? else {
            return Ok(ViewState::default());
        };
        match serde_json::from_str::<ViewState>(&raw) {
            Ok(state) => Ok(state),
            Err(err) => {
                warn!(
                    "event=view_state_load module=service status=error error_code=view_state_corrupt error={err}"
                );
                Ok(ViewState::default())
            }
        }
    }

    /// Returns `state` with `granularity` selected, after persisting it.
    pub fn select_granularity(
        &self,
        state: ViewState,
        granularity: Granularity,
    ) -> ServiceResult<ViewState> {
        let next = state.with_granularity(granularity);
        let raw = serde_json::to_string(&next)
            .map_err(|_| ServiceError::InconsistentState("view state is not serializable"))?;
        self.store.save_state(STATS_VIEW_KEY, &raw)?;
        Ok(next)
    }
}
