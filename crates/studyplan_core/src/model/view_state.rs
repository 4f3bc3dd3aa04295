//! Statistics view state.
//!
//! Kept as a plain value: callers pass the current state in and receive the
//! next state back. Persistence goes through `ViewStateStore`.

use crate::stats::Granularity;
use serde::{Deserialize, Serialize};

/// Storage key used for the statistics view.
pub const STATS_VIEW_KEY: &str = "stats.view";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub granularity: Granularity,
}

impl ViewState {
    pub fn with_granularity(self, granularity: Granularity) -> Self {
        Self { granularity }
    }
}
