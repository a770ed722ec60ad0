use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::math::duration_hours;

/// One continuous fired period, closed at both ends.
///
/// Only the segmenter builds these, and it never emits one with `stop <= start`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FiringInterval {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl FiringInterval {
    /// Returns `None` when the pair does not describe a positive duration.
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> Option<Self> {
        if stop > start {
            Some(Self { start, stop })
        } else {
            None
        }
    }

    pub fn duration(&self) -> Duration {
        self.stop - self.start
    }

    pub fn duration_hours(&self) -> f64 {
        duration_hours(self.duration())
    }
}
