use chrono::{DateTime, Utc};

use crate::error::ForecastError;
use crate::forecast::types::{Forecast, ForecastConfig, ForecastResult, TrendProjection};
use crate::{log_info, log_warn};
use crate::models::Sample;
use crate::segmentation::AggregateStats;
use crate::severity::SeverityEstimate;
use crate::utils::math::{days_to_duration, hours_to_duration};
use crate::utils::safe_divide;

const ENABLE_LOGS: bool = true;

/// Project the three overhaul dates.
///
/// `samples` must be the full, time-sorted dataset; the startup date is the first
/// fired sample in it, not the first closed interval.
pub fn forecast(
    samples: &[Sample],
    stats: &AggregateStats,
    severity: &SeverityEstimate,
    config: &ForecastConfig,
) -> Result<Forecast, ForecastError> {
    let startup_date = samples
        .iter()
        .find(|s| s.is_fired(config.fired_speed_threshold))
        .map(|s| s.timestamp)
        .ok_or(ForecastError::NoFiringData {
            threshold: config.fired_speed_threshold,
        })?;
    // A fired sample exists, so the dataset is not empty.
    let last_sample_date = samples
        .iter()
        .map(|s| s.timestamp)
        .max()
        .unwrap_or(startup_date);

    let extra_eoh_hours = severity.extra_eoh_hours(stats);
    let calendar_oh_date = offset_by_hours(startup_date, config.overhaul_hour_budget, "calendar")?;
    let eoh_adjusted_oh_date = offset_by_hours(calendar_oh_date, extra_eoh_hours, "EOH-adjusted")?;

    let mut trend = project_trend(
        startup_date,
        last_sample_date,
        stats.total_fired_hours,
        config.overhaul_hour_budget,
    );
    let trend_oh_date = match days_to_duration(trend.days_to_reach_oh)
        .and_then(|offset| last_sample_date.checked_add_signed(offset))
    {
        Some(date) => date,
        None => {
            log_warn!(
                "Trend projection of {:.0} days from {} leaves the calendar range; clamping",
                trend.days_to_reach_oh,
                last_sample_date
            );
            trend.low_confidence = true;
            trend.beyond_date_range = true;
            if trend.days_to_reach_oh < 0.0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            }
        }
    };

    log_info!(
        "Forecast: startup {}, calendar {}, EOH-adjusted {}, trend {}",
        startup_date.date_naive(),
        calendar_oh_date.date_naive(),
        eoh_adjusted_oh_date.date_naive(),
        trend_oh_date.date_naive()
    );

    Ok(Forecast {
        dates: ForecastResult {
            startup_date,
            calendar_oh_date,
            eoh_adjusted_oh_date,
            trend_oh_date,
        },
        trend,
        extra_eoh_hours,
    })
}

fn offset_by_hours(
    base: DateTime<Utc>,
    hours: f64,
    projection: &'static str,
) -> Result<DateTime<Utc>, ForecastError> {
    hours_to_duration(hours)
        .and_then(|offset| base.checked_add_signed(offset))
        .ok_or(ForecastError::ProjectionOutOfRange {
            projection,
            base,
            offset_hours: hours,
        })
}

/// Extrapolate the fired-hours accumulation rate out to the budget.
pub fn project_trend(
    startup_date: DateTime<Utc>,
    last_sample_date: DateTime<Utc>,
    total_fired_hours: f64,
    overhaul_hour_budget: f64,
) -> TrendProjection {
    let days_since_start = (last_sample_date - startup_date).num_days().max(1);
    let avg_fired_hours_per_day = safe_divide(total_fired_hours, days_since_start as f64, 0.0);
    let remaining_fired_hours = overhaul_hour_budget - total_fired_hours;
    let days_to_reach_oh = safe_divide(remaining_fired_hours, avg_fired_hours_per_day, 0.0);

    TrendProjection {
        days_since_start,
        avg_fired_hours_per_day,
        remaining_fired_hours,
        days_to_reach_oh,
        low_confidence: avg_fired_hours_per_day == 0.0,
        beyond_date_range: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn jan_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn calendar_and_eoh_dates_follow_budget() {
        let samples = vec![
            Sample::new(jan_first() - Duration::days(3), 0.0),
            Sample::new(jan_first(), 3000.0),
            Sample::new(jan_first() + Duration::days(10), 0.0),
        ];
        let stats = AggregateStats {
            total_fired_hours: 42_000.0,
            start_count: 10,
            start_frequency: 10.0 / 42_000.0,
        };
        let severity = SeverityEstimate {
            maintenance_factor: 2.0,
            equivalent_operating_hours: 84_000.0,
        };

        let result = forecast(&samples, &stats, &severity, &ForecastConfig::default()).unwrap();

        assert_eq!(result.extra_eoh_hours, 42_000.0);
        assert_eq!(result.dates.startup_date, jan_first());
        assert_eq!(
            result.dates.calendar_oh_date,
            jan_first() + Duration::hours(84_000)
        );
        assert_eq!(
            result.dates.eoh_adjusted_oh_date,
            result.dates.calendar_oh_date + Duration::hours(42_000)
        );
    }

    #[test]
    fn same_day_window_uses_one_day_floor() {
        let trend = project_trend(jan_first(), jan_first(), 100.0, 84_000.0);
        assert_eq!(trend.days_since_start, 1);
        assert_eq!(trend.avg_fired_hours_per_day, 100.0);
        assert_eq!(trend.remaining_fired_hours, 83_900.0);
        assert_eq!(trend.days_to_reach_oh, 839.0);
        assert!(!trend.low_confidence);
    }

    #[test]
    fn trend_date_counts_from_last_sample() {
        let samples = vec![
            Sample::new(jan_first(), 3000.0),
            Sample::new(jan_first() + Duration::hours(5), 0.0),
        ];
        let stats = AggregateStats {
            total_fired_hours: 100.0,
            start_count: 1,
            start_frequency: 0.01,
        };
        let severity = SeverityEstimate {
            maintenance_factor: 1.3,
            equivalent_operating_hours: 130.0,
        };
        let result = forecast(&samples, &stats, &severity, &ForecastConfig::default()).unwrap();
        assert_eq!(
            result.dates.trend_oh_date,
            jan_first() + Duration::hours(5) + Duration::days(839)
        );
    }

    #[test]
    fn exceeded_budget_projects_into_the_past() {
        let last = jan_first() + Duration::days(10);
        let trend = project_trend(jan_first(), last, 200.0, 100.0);
        assert_eq!(trend.avg_fired_hours_per_day, 20.0);
        assert_eq!(trend.remaining_fired_hours, -100.0);
        assert_eq!(trend.days_to_reach_oh, -5.0);
    }

    #[test]
    fn zero_rate_collapses_to_last_sample() {
        let trend = project_trend(jan_first(), jan_first() + Duration::days(4), 0.0, 84_000.0);
        assert_eq!(trend.avg_fired_hours_per_day, 0.0);
        assert_eq!(trend.days_to_reach_oh, 0.0);
        assert!(trend.low_confidence);
    }

    #[test]
    fn partial_days_are_truncated() {
        let last = jan_first() + Duration::days(3) + Duration::hours(23);
        let trend = project_trend(jan_first(), last, 30.0, 84_000.0);
        assert_eq!(trend.days_since_start, 3);
        assert_eq!(trend.avg_fired_hours_per_day, 10.0);
    }

    fn short_run_then_idle() -> Vec<Sample> {
        vec![
            Sample::new(jan_first(), 3000.0),
            Sample::new(jan_first() + Duration::minutes(6), 0.0),
            Sample::new(jan_first() + Duration::days(1000), 0.0),
        ]
    }

    fn stats_for_hours(total_fired_hours: f64) -> AggregateStats {
        AggregateStats {
            total_fired_hours,
            start_count: 1,
            start_frequency: 1.0 / total_fired_hours,
        }
    }

    #[test]
    fn trend_past_calendar_range_is_clamped_and_flagged() {
        let severity = SeverityEstimate {
            maintenance_factor: 1.0,
            equivalent_operating_hours: 0.1,
        };
        let result = forecast(
            &short_run_then_idle(),
            &stats_for_hours(0.1),
            &severity,
            &ForecastConfig::default(),
        )
        .unwrap();

        assert!(result.trend.beyond_date_range);
        assert!(result.trend.low_confidence);
        assert_eq!(result.dates.trend_oh_date, DateTime::<Utc>::MAX_UTC);
        assert_eq!(
            result.dates.calendar_oh_date,
            jan_first() + Duration::hours(84_000)
        );
    }

    #[test]
    fn oversized_budget_is_an_error_not_a_panic() {
        let config = ForecastConfig {
            overhaul_hour_budget: 1e16,
            ..ForecastConfig::default()
        };
        let severity = SeverityEstimate {
            maintenance_factor: 1.0,
            equivalent_operating_hours: 0.1,
        };
        let err = forecast(&short_run_then_idle(), &stats_for_hours(0.1), &severity, &config)
            .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ProjectionOutOfRange {
                projection: "calendar",
                ..
            }
        ));
    }

    #[test]
    fn no_fired_sample_is_an_error() {
        let samples = vec![
            Sample::new(jan_first(), 100.0),
            Sample::new(jan_first() + Duration::hours(1), 1100.0),
        ];
        let err = forecast(
            &samples,
            &AggregateStats::default(),
            &SeverityEstimate {
                maintenance_factor: 1.0,
                equivalent_operating_hours: 0.0,
            },
            &ForecastConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ForecastError::NoFiringData { .. }));
    }
}
