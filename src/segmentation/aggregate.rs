use serde::{Deserialize, Serialize};

use crate::models::FiringInterval;
use crate::utils::safe_divide;

/// Operating-hour totals derived from a set of firing intervals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_fired_hours: f64,
    /// Every interval carries exactly one start.
    pub start_count: usize,
    /// Starts per fired hour; 0 when there are no fired hours.
    pub start_frequency: f64,
}

impl AggregateStats {
    pub fn from_intervals(intervals: &[FiringInterval]) -> Self {
        let total_fired_hours: f64 = intervals.iter().map(FiringInterval::duration_hours).sum();
        let start_count = intervals.len();

        Self {
            total_fired_hours,
            start_count,
            start_frequency: safe_divide(start_count as f64, total_fired_hours, 0.0),
        }
    }
}
