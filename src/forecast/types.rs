use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inputs the forecaster needs beyond the pipeline's own outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// Fired hours allowed between overhauls.
    pub overhaul_hour_budget: f64,
    pub fired_speed_threshold: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            overhaul_hour_budget: 84_000.0,
            fired_speed_threshold: 1100.0,
        }
    }
}

/// The three overhaul estimates, plus the startup date they hang off.
///
/// Each date answers a different question; none of them is "the" answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// First fired sample in the data.
    pub startup_date: DateTime<Utc>,
    /// Startup plus the whole budget as wall-clock hours (continuous firing).
    pub calendar_oh_date: DateTime<Utc>,
    /// Calendar estimate shifted by the extra wear hours from the severity factor.
    pub eoh_adjusted_oh_date: DateTime<Utc>,
    /// Last sample plus the days needed at the observed fired-hours rate.
    pub trend_oh_date: DateTime<Utc>,
}

/// Metrics behind the trend estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendProjection {
    /// Whole days from startup to the last sample, at least 1.
    pub days_since_start: i64,
    pub avg_fired_hours_per_day: f64,
    /// Negative once the budget is already used up.
    pub remaining_fired_hours: f64,
    pub days_to_reach_oh: f64,
    /// Set when no daily fired-hours rate could be measured (the projection then
    /// collapses onto the last sample) or when the trend date had to be clamped.
    pub low_confidence: bool,
    /// The trend date fell outside chrono's calendar and was pinned to its edge.
    #[serde(default)]
    pub beyond_date_range: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub dates: ForecastResult,
    pub trend: TrendProjection,
    pub extra_eoh_hours: f64,
}
