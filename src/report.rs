use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::forecast::Forecast;
use crate::models::{FiredSample, FiringInterval};
use crate::segmentation::{AggregateStats, DataQualityWarning};
use crate::severity::SeverityEstimate;

/// Duration of one firing event, keyed by its start. Chart-ready view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FiringDuration {
    pub start: DateTime<Utc>,
    pub duration_hours: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryRow {
    pub metric: &'static str,
    pub value: String,
}

/// Everything one run computes, ready for a presentation layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub intervals: Vec<FiringInterval>,
    pub stats: AggregateStats,
    pub severity: SeverityEstimate,
    pub forecast: Forecast,
    pub warnings: Vec<DataQualityWarning>,
    /// Firing still running when the data ends; not included in any total.
    pub unclosed_start: Option<DateTime<Utc>>,
    pub speed_series: Vec<FiredSample>,
}

/// JSON document: the report plus its derived views.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    #[serde(flatten)]
    report: &'a ForecastReport,
    firing_durations: Vec<FiringDuration>,
    summary: Vec<SummaryRow>,
}

impl ForecastReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ReportDocument {
            report: self,
            firing_durations: self.firing_durations(),
            summary: self.summary_rows(),
        })
    }

    pub fn firing_durations(&self) -> Vec<FiringDuration> {
        self.intervals
            .iter()
            .map(|interval| FiringDuration {
                start: interval.start,
                duration_hours: interval.duration_hours(),
            })
            .collect()
    }

    /// The four dates, as ISO calendar dates.
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        let dates = &self.forecast.dates;
        vec![
            SummaryRow {
                metric: "First Firing Date after Overhauling",
                value: iso_date(dates.startup_date),
            },
            SummaryRow {
                metric: "Expected OH Date (Calendar Time)",
                value: iso_date(dates.calendar_oh_date),
            },
            SummaryRow {
                metric: "Expected OH Date (EOH Adjusted)",
                value: iso_date(dates.eoh_adjusted_oh_date),
            },
            SummaryRow {
                metric: "Projected OH Date (Fired Hours Trend)",
                value: iso_date(dates.trend_oh_date),
            },
        ]
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Firing Summary")?;
        for interval in &self.intervals {
            writeln!(
                f,
                "  {}  ->  {}  {:>10.2} hrs",
                interval.start.format("%Y-%m-%d %H:%M:%S"),
                interval.stop.format("%Y-%m-%d %H:%M:%S"),
                interval.duration_hours()
            )?;
        }
        if let Some(start) = self.unclosed_start {
            writeln!(
                f,
                "  {}  ->  (still fired at end of data, not counted)",
                start.format("%Y-%m-%d %H:%M:%S")
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Overhaul Forecast Summary")?;
        for row in self.summary_rows() {
            writeln!(f, "  {:<40}{}", row.metric, row.value)?;
        }

        let trend = &self.forecast.trend;
        writeln!(f)?;
        writeln!(f, "Calculated Values")?;
        writeln!(f, "  Total Fired Hours: {:.2} hrs", self.stats.total_fired_hours)?;
        writeln!(f, "  Number of Starts: {}", self.stats.start_count)?;
        writeln!(f, "  Maintenance Factor: {:.2}", self.severity.maintenance_factor)?;
        writeln!(
            f,
            "  Equivalent Operating Hours (EOH): {:.2} hrs",
            self.severity.equivalent_operating_hours
        )?;
        writeln!(f, "  Avg Fired Hrs/Day: {:.2} hrs", trend.avg_fired_hours_per_day)?;
        if trend.beyond_date_range {
            writeln!(
                f,
                "  Note: trend projection ({:.0} days) is past the supported calendar; date is clamped",
                trend.days_to_reach_oh
            )?;
        } else if trend.low_confidence {
            writeln!(
                f,
                "  Note: no measurable fired-hours rate; trend projection is low confidence"
            )?;
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Data Quality Warnings")?;
            for warning in &self.warnings {
                writeln!(f, "  {}", warning.message)?;
            }
        }

        Ok(())
    }
}

fn iso_date(value: DateTime<Utc>) -> String {
    value.date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{ForecastResult, TrendProjection};
    use chrono::{Duration, TimeZone};

    fn sample_report() -> ForecastReport {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 6, 0, 0).unwrap();
        let interval = FiringInterval::new(start, start + Duration::minutes(90)).unwrap();
        ForecastReport {
            intervals: vec![interval],
            stats: AggregateStats::from_intervals(&[interval]),
            severity: SeverityEstimate {
                maintenance_factor: 3.0,
                equivalent_operating_hours: 4.5,
            },
            forecast: Forecast {
                dates: ForecastResult {
                    startup_date: start,
                    calendar_oh_date: start + Duration::hours(84_000),
                    eoh_adjusted_oh_date: start + Duration::hours(84_003),
                    trend_oh_date: start + Duration::days(56_000),
                },
                trend: TrendProjection {
                    days_since_start: 1,
                    avg_fired_hours_per_day: 1.5,
                    remaining_fired_hours: 83_998.5,
                    days_to_reach_oh: 55_999.0,
                    low_confidence: false,
                    beyond_date_range: false,
                },
                extra_eoh_hours: 3.0,
            },
            warnings: Vec::new(),
            unclosed_start: None,
            speed_series: Vec::new(),
        }
    }

    #[test]
    fn summary_uses_iso_dates() {
        let rows = sample_report().summary_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].metric, "First Firing Date after Overhauling");
        assert_eq!(rows[0].value, "2020-01-01");
        // 84000 h = 3500 days
        assert_eq!(rows[1].value, "2029-08-01");
    }

    #[test]
    fn durations_view_matches_intervals() {
        let durations = sample_report().firing_durations();
        assert_eq!(durations.len(), 1);
        assert_eq!(durations[0].duration_hours, 1.5);
    }

    #[test]
    fn text_lists_calculated_values() {
        let text = sample_report().render_text();
        assert!(text.contains("Total Fired Hours: 1.50 hrs"));
        assert!(text.contains("Number of Starts: 1"));
        assert!(text.contains("Maintenance Factor: 3.00"));
        assert!(!text.contains("low confidence"));
    }

    #[test]
    fn clamped_trend_is_called_out() {
        let mut report = sample_report();
        report.forecast.trend.low_confidence = true;
        report.forecast.trend.beyond_date_range = true;
        let text = report.to_string();
        assert!(text.contains("past the supported calendar"));
        assert!(!text.contains("no measurable fired-hours rate"));
        assert_eq!(text, report.render_text());
    }

    #[test]
    fn json_carries_views() {
        let json: serde_json::Value =
            serde_json::from_str(&sample_report().to_json().unwrap()).unwrap();
        assert_eq!(json["stats"]["startCount"], 1);
        assert_eq!(json["firingDurations"][0]["durationHours"], 1.5);
        assert_eq!(json["summary"][3]["metric"], "Projected OH Date (Fired Hours Trend)");
        assert!(json["forecast"]["dates"]["trendOhDate"].is_string());
    }
}
