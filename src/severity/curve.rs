//! Maintenance-factor lookup curve.
//!
//! Maps start frequency (starts per fired hour) to a severity multiplier. Between
//! control points the curve is piecewise linear. Outside its domain it keeps the
//! slope of the nearest edge segment instead of clamping, so a machine that almost
//! never restarts can land below the first factor. That extrapolation is part of
//! the contract and is tested as such.

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurvePoint {
    /// Starts per fired hour.
    pub frequency: f64,
    pub factor: f64,
}

impl CurvePoint {
    pub const fn new(frequency: f64, factor: f64) -> Self {
        Self { frequency, factor }
    }
}

/// Reference curve: 1.1 at 0.001 starts/h up to 5.0 at one start per fired hour.
pub const DEFAULT_CURVE_POINTS: [CurvePoint; 8] = [
    CurvePoint::new(0.001, 1.1),
    CurvePoint::new(0.01, 1.3),
    CurvePoint::new(0.02, 1.45),
    CurvePoint::new(0.05, 1.7),
    CurvePoint::new(0.1, 2.1),
    CurvePoint::new(0.2, 2.9),
    CurvePoint::new(0.5, 4.0),
    CurvePoint::new(1.0, 5.0),
];

/// Validated, immutable set of control points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityCurve {
    points: Vec<CurvePoint>,
}

impl SeverityCurve {
    /// Frequencies must be finite and strictly increasing; factors finite and
    /// non-decreasing. At least two points are needed to have a slope at the edges.
    pub fn new(points: Vec<CurvePoint>) -> Result<Self, ForecastError> {
        if points.len() < 2 {
            return Err(ForecastError::InvalidCurve(format!(
                "need at least 2 control points, got {}",
                points.len()
            )));
        }

        if let Some(bad) = points
            .iter()
            .find(|p| !p.frequency.is_finite() || !p.factor.is_finite())
        {
            return Err(ForecastError::InvalidCurve(format!(
                "non-finite control point ({}, {})",
                bad.frequency, bad.factor
            )));
        }

        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.frequency <= a.frequency {
                return Err(ForecastError::InvalidCurve(format!(
                    "frequencies must be strictly increasing: {} then {}",
                    a.frequency, b.frequency
                )));
            }
            if b.factor < a.factor {
                return Err(ForecastError::InvalidCurve(format!(
                    "factor decreases from {} to {} between frequencies {} and {}",
                    a.factor, b.factor, a.frequency, b.frequency
                )));
            }
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Maintenance factor at `frequency`.
    pub fn factor_at(&self, frequency: f64) -> f64 {
        let (a, b) = self.segment_for(frequency);
        let slope = (b.factor - a.factor) / (b.frequency - a.frequency);
        a.factor + (frequency - a.frequency) * slope
    }

    /// Bracketing segment, or the nearest edge segment when out of domain.
    fn segment_for(&self, frequency: f64) -> (CurvePoint, CurvePoint) {
        let last = self.points.len() - 1;
        // Index of the first point strictly above `frequency`, kept within 1..=last
        // so both edge segments are reused for extrapolation.
        let upper = self
            .points
            .partition_point(|p| p.frequency <= frequency)
            .clamp(1, last);
        (self.points[upper - 1], self.points[upper])
    }
}

impl Default for SeverityCurve {
    fn default() -> Self {
        Self {
            points: DEFAULT_CURVE_POINTS.to_vec(),
        }
    }
}
