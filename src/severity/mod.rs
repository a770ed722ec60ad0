pub mod curve;

pub use curve::{CurvePoint, SeverityCurve, DEFAULT_CURVE_POINTS};

use serde::{Deserialize, Serialize};

use crate::segmentation::AggregateStats;

/// Maintenance factor and the equivalent operating hours it implies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeverityEstimate {
    pub maintenance_factor: f64,
    /// Fired hours scaled by the maintenance factor.
    pub equivalent_operating_hours: f64,
}

impl SeverityEstimate {
    /// Wear hours the factor adds on top of raw fired time. Negative when the
    /// factor is below 1.
    pub fn extra_eoh_hours(&self, stats: &AggregateStats) -> f64 {
        self.equivalent_operating_hours - stats.total_fired_hours
    }
}

pub fn estimate_severity(stats: &AggregateStats, curve: &SeverityCurve) -> SeverityEstimate {
    let maintenance_factor = curve.factor_at(stats.start_frequency);
    SeverityEstimate {
        maintenance_factor,
        equivalent_operating_hours: stats.total_fired_hours * maintenance_factor,
    }
}
