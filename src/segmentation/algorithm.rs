use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{FiredSample, FiringInterval};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Machine state while scanning the speed log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FiringState {
    Stopped,
    Fired { since: DateTime<Utc> },
}

/// A start/stop pair that could not become an interval because its duration was
/// not positive (duplicate timestamps, clock skew). The pair is left out of every
/// aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub message: String,
}

/// Result of segmenting one speed log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationOutcome {
    /// Closed intervals, ordered by start.
    pub intervals: Vec<FiringInterval>,
    pub warnings: Vec<DataQualityWarning>,
    /// Start of a firing still in progress when the data ends.
    ///
    /// Known limitation: its true duration is unknown, so it is never counted as an
    /// interval. It is kept here only so callers can show what was dropped.
    pub unclosed_start: Option<DateTime<Utc>>,
}

impl SegmentationOutcome {
    fn close(&mut self, start: DateTime<Utc>, stop: DateTime<Utc>) {
        match FiringInterval::new(start, stop) {
            Some(interval) => self.intervals.push(interval),
            None => {
                log_warn!(
                    "Skipping firing interval with non-positive duration: {} -> {}",
                    start.to_rfc3339(),
                    stop.to_rfc3339()
                );
                self.warnings.push(DataQualityWarning {
                    start,
                    stop,
                    message: format!(
                        "firing stop at {} does not follow start at {}",
                        stop.to_rfc3339(),
                        start.to_rfc3339()
                    ),
                });
            }
        }
    }
}

/// Turn an ordered fired/not-fired series into closed firing intervals.
///
/// The first sample only seeds the state: if it is already fired, the pending start
/// is its own timestamp, never anything earlier. Each fired -> not-fired transition
/// closes the pending interval at the not-fired sample's timestamp.
pub fn segment_firings(samples: &[FiredSample]) -> SegmentationOutcome {
    let mut iter = samples.iter();
    let Some(first) = iter.next() else {
        return SegmentationOutcome::default();
    };

    let initial = if first.fired {
        FiringState::Fired {
            since: first.timestamp,
        }
    } else {
        FiringState::Stopped
    };

    let (final_state, mut outcome) = iter.fold(
        (initial, SegmentationOutcome::default()),
        |(state, mut outcome), sample| {
            let next = match (state, sample.fired) {
                (FiringState::Stopped, true) => FiringState::Fired {
                    since: sample.timestamp,
                },
                (FiringState::Fired { since }, false) => {
                    outcome.close(since, sample.timestamp);
                    FiringState::Stopped
                }
                (unchanged, _) => unchanged,
            };
            (next, outcome)
        },
    );

    if let FiringState::Fired { since } = final_state {
        log_warn!(
            "Firing started at {} has no stop before the end of data; excluded from totals",
            since.to_rfc3339()
        );
        outcome.unclosed_start = Some(since);
    }

    log_info!(
        "Segmented {} samples into {} firing intervals ({} skipped)",
        samples.len(),
        outcome.intervals.len(),
        outcome.warnings.len()
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{mark_fired, Sample};
    use crate::segmentation::SegmentationConfig;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn hourly(flags: &[bool]) -> Vec<FiredSample> {
        flags
            .iter()
            .enumerate()
            .map(|(h, &fired)| FiredSample {
                timestamp: base() + Duration::hours(h as i64),
                speed: if fired { 5000.0 } else { 0.0 },
                fired,
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        let outcome = segment_firings(&[]);
        assert!(outcome.intervals.is_empty());
        assert!(outcome.unclosed_start.is_none());
    }

    #[test]
    fn never_fired_yields_no_intervals() {
        let outcome = segment_firings(&hourly(&[false; 12]));
        assert!(outcome.intervals.is_empty());
        assert!(outcome.warnings.is_empty());
        assert!(outcome.unclosed_start.is_none());
    }

    #[test]
    fn fired_whole_window_yields_no_intervals() {
        let outcome = segment_firings(&hourly(&[true; 12]));
        assert!(outcome.intervals.is_empty());
        assert_eq!(outcome.unclosed_start, Some(base()));
    }

    #[test]
    fn two_runs_become_two_intervals() {
        // fired 0-10h, idle 10-20h, fired 20-25h, idle until 30h
        let flags: Vec<bool> = (0..=30).map(|h| h < 10 || (20..25).contains(&h)).collect();
        let outcome = segment_firings(&hourly(&flags));

        assert_eq!(
            outcome.intervals,
            vec![
                FiringInterval::new(base(), base() + Duration::hours(10)).unwrap(),
                FiringInterval::new(base() + Duration::hours(20), base() + Duration::hours(25))
                    .unwrap(),
            ]
        );
        assert!(outcome.unclosed_start.is_none());
    }

    #[test]
    fn leading_fired_sample_starts_at_window_edge() {
        let outcome = segment_firings(&hourly(&[true, true, false]));
        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(outcome.intervals[0].start, base());
        assert_eq!(outcome.intervals[0].stop, base() + Duration::hours(2));
    }

    #[test]
    fn trailing_start_is_dropped_and_reported() {
        let outcome = segment_firings(&hourly(&[false, true, false, false, true, true]));
        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(outcome.unclosed_start, Some(base() + Duration::hours(4)));
    }

    #[test]
    fn duplicate_timestamp_transition_is_skipped_with_warning() {
        let t = base() + Duration::hours(1);
        let samples = vec![
            FiredSample { timestamp: base(), speed: 0.0, fired: false },
            FiredSample { timestamp: t, speed: 5000.0, fired: true },
            FiredSample { timestamp: t, speed: 0.0, fired: false },
            FiredSample { timestamp: t + Duration::hours(1), speed: 5000.0, fired: true },
            FiredSample { timestamp: t + Duration::hours(3), speed: 0.0, fired: false },
        ];

        let outcome = segment_firings(&samples);

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].start, t);
        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(outcome.intervals[0].duration_hours(), 2.0);
    }

    #[test]
    fn default_threshold_marks_fired_strictly_above() {
        let samples: Vec<Sample> = [900.0, 1200.0, 1300.0, 1100.0]
            .iter()
            .enumerate()
            .map(|(h, &speed)| Sample::new(base() + Duration::hours(h as i64), speed))
            .collect();
        let threshold = SegmentationConfig::default().fired_speed_threshold;
        let outcome = segment_firings(&mark_fired(&samples, threshold));
        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(outcome.intervals[0].duration_hours(), 2.0);
    }
}
