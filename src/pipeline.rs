use anyhow::anyhow;

use crate::error::ForecastError;
use crate::forecast::{forecast, ForecastConfig};
use crate::models::{mark_fired, Sample};
use crate::report::ForecastReport;
use crate::segmentation::{segment_firings, AggregateStats, SegmentationConfig};
use crate::settings::ForecastSettings;
use crate::severity::{estimate_severity, SeverityCurve};
use crate::log_info;

const ENABLE_LOGS: bool = true;

/// The full samples -> intervals -> aggregates -> severity -> forecast chain.
///
/// Stateless between runs; calling [`Pipeline::run`] twice on the same input gives
/// the same report.
#[derive(Debug, Clone)]
pub struct Pipeline {
    segmentation: SegmentationConfig,
    forecast: ForecastConfig,
    curve: SeverityCurve,
}

impl Pipeline {
    pub fn new(settings: &ForecastSettings) -> Result<Self, ForecastError> {
        let curve = settings.validate()?;
        Ok(Self {
            segmentation: settings.segmentation_config(),
            forecast: settings.forecast_config(),
            curve,
        })
    }

    pub fn run(&self, samples: Vec<Sample>) -> Result<ForecastReport, ForecastError> {
        let samples = prepare_samples(samples)?;
        if samples.is_empty() {
            return Err(ForecastError::NoFiringData {
                threshold: self.segmentation.fired_speed_threshold,
            });
        }

        let speed_series = mark_fired(&samples, self.segmentation.fired_speed_threshold);
        let outcome = segment_firings(&speed_series);
        let stats = AggregateStats::from_intervals(&outcome.intervals);
        let severity = estimate_severity(&stats, &self.curve);

        log_info!(
            "{} starts over {:.2} fired hours ({:.4} starts/h), maintenance factor {:.3}",
            stats.start_count,
            stats.total_fired_hours,
            stats.start_frequency,
            severity.maintenance_factor
        );

        let forecast = forecast(&samples, &stats, &severity, &self.forecast)?;

        Ok(ForecastReport {
            intervals: outcome.intervals,
            stats,
            severity,
            forecast,
            warnings: outcome.warnings,
            unclosed_start: outcome.unclosed_start,
            speed_series,
        })
    }
}

/// Reject unusable speeds and sort by timestamp.
///
/// The sort is stable, so rows sharing a timestamp keep their input order.
pub fn prepare_samples(mut samples: Vec<Sample>) -> Result<Vec<Sample>, ForecastError> {
    if let Some(bad) = samples
        .iter()
        .find(|s| !s.speed.is_finite() || s.speed < 0.0)
    {
        return Err(ForecastError::DataLoad(anyhow!(
            "invalid speed {} at {}",
            bad.speed,
            bad.timestamp.to_rfc3339()
        )));
    }
    samples.sort_by_key(|s| s.timestamp);
    Ok(samples)
}
