use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed value of a field for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation<T> {
    /// Value of the plan's time field for this observation.
    pub time: DateTime<Utc>,
    /// Value of the plan's run id field, when the plan declares one.
    #[serde(default)]
    pub run_id: Option<String>,
    pub value: T,
}

impl<T> Observation<T> {
    pub fn new(time: DateTime<Utc>, value: T) -> Self {
        Self {
            time,
            run_id: None,
            value,
        }
    }

    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Ordering used for every fold: by time, then by run id (absent first).
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.run_id.cmp(&other.run_id))
    }
}

/// Stable chronological sort of observations.
pub fn sort_chronologically<T>(observations: &mut [Observation<T>]) {
    observations.sort_by(Observation::chronological_cmp);
}
