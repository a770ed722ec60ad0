//! Machine speed samples.
//!
//! A `Sample` is one row of the speed log. Whether it counts as "fired" depends on
//! the configured threshold, so the flag is derived rather than stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    /// Shaft speed in RPM.
    pub speed: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, speed: f64) -> Self {
        Self { timestamp, speed }
    }

    /// Strictly above the threshold; a sample sitting exactly on it is not fired.
    pub fn is_fired(&self, fired_speed_threshold: f64) -> bool {
        self.speed > fired_speed_threshold
    }
}

/// A sample with its fired flag resolved against a threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FiredSample {
    pub timestamp: DateTime<Utc>,
    pub speed: f64,
    pub fired: bool,
}

impl FiredSample {
    pub fn from_sample(sample: &Sample, fired_speed_threshold: f64) -> Self {
        Self {
            timestamp: sample.timestamp,
            speed: sample.speed,
            fired: sample.is_fired(fired_speed_threshold),
        }
    }
}

/// Resolve the fired flag for every sample, preserving order.
pub fn mark_fired(samples: &[Sample], fired_speed_threshold: f64) -> Vec<FiredSample> {
    samples
        .iter()
        .map(|s| FiredSample::from_sample(s, fired_speed_threshold))
        .collect()
}
