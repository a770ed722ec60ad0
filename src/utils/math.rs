//! Numeric helpers shared by the aggregation and forecasting stages.

use chrono::Duration;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Divide `num` by `den`, returning `floor` when the denominator is zero.
///
/// Used wherever a rate can legitimately have nothing underneath it: starts per
/// fired hour with no fired hours, fired hours per day with no accumulation.
/// A zero denominator is a defined outcome there, not an error.
pub fn safe_divide(num: f64, den: f64, floor: f64) -> f64 {
    if den == 0.0 {
        floor
    } else {
        num / den
    }
}

/// Length of a chrono duration in fractional hours.
pub fn duration_hours(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Fractional hours as a chrono duration, rounded to the millisecond.
///
/// `None` when the value is not finite or does not fit in a `Duration`.
pub fn hours_to_duration(hours: f64) -> Option<Duration> {
    millis_to_duration(hours * MILLIS_PER_HOUR)
}

/// Fractional days as a chrono duration, rounded to the millisecond.
///
/// `None` when the value is not finite or does not fit in a `Duration`.
pub fn days_to_duration(days: f64) -> Option<Duration> {
    millis_to_duration(days * MILLIS_PER_DAY)
}

fn millis_to_duration(millis: f64) -> Option<Duration> {
    let millis = millis.round();
    // `as i64` saturates, so the range has to be checked on the float side.
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}
