use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::ForecastError;
use crate::forecast::ForecastConfig;
use crate::segmentation::SegmentationConfig;
use crate::severity::{CurvePoint, SeverityCurve, DEFAULT_CURVE_POINTS};

/// Largest accepted overhaul budget, in fired hours (a little over 1100 years).
pub const MAX_OVERHAUL_HOUR_BUDGET: f64 = 10_000_000.0;

/// Column names used to pick timestamp and speed out of a tabular dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSourceSettings {
    pub timestamp_column: String,
    pub speed_column: String,
}

impl Default for DataSourceSettings {
    fn default() -> Self {
        Self {
            timestamp_column: "Date".into(),
            speed_column: "AASPEED.PV/SIG".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastSettings {
    /// RPM above which the machine counts as fired.
    pub fired_speed_threshold: f64,
    /// Fired hours allowed before an overhaul.
    pub overhaul_hour_budget: f64,
    pub severity_curve: Vec<CurvePoint>,
    pub data_source: DataSourceSettings,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            fired_speed_threshold: 1100.0,
            overhaul_hour_budget: 84_000.0,
            severity_curve: DEFAULT_CURVE_POINTS.to_vec(),
            data_source: DataSourceSettings::default(),
        }
    }
}

impl ForecastSettings {
    /// Check ranges and build the severity curve.
    pub fn validate(&self) -> Result<SeverityCurve, ForecastError> {
        if !self.fired_speed_threshold.is_finite() || self.fired_speed_threshold < 0.0 {
            return Err(ForecastError::InvalidSettings(format!(
                "firedSpeedThreshold must be a finite value >= 0, got {}",
                self.fired_speed_threshold
            )));
        }
        if !self.overhaul_hour_budget.is_finite()
            || self.overhaul_hour_budget <= 0.0
            || self.overhaul_hour_budget > MAX_OVERHAUL_HOUR_BUDGET
        {
            return Err(ForecastError::InvalidSettings(format!(
                "overhaulHourBudget must be in (0, {MAX_OVERHAUL_HOUR_BUDGET}], got {}",
                self.overhaul_hour_budget
            )));
        }
        if self.data_source.timestamp_column.is_empty() || self.data_source.speed_column.is_empty()
        {
            return Err(ForecastError::InvalidSettings(
                "dataSource column names must not be empty".into(),
            ));
        }
        SeverityCurve::new(self.severity_curve.clone())
    }

    pub fn segmentation_config(&self) -> SegmentationConfig {
        SegmentationConfig {
            fired_speed_threshold: self.fired_speed_threshold,
        }
    }

    pub fn forecast_config(&self) -> ForecastConfig {
        ForecastConfig {
            overhaul_hour_budget: self.overhaul_hour_budget,
            fired_speed_threshold: self.fired_speed_threshold,
        }
    }
}

/// Settings backed by a JSON file. A missing file means defaults.
pub struct SettingsStore {
    path: PathBuf,
    data: ForecastSettings,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        } else {
            ForecastSettings::default()
        };

        Ok(Self { path, data })
    }

    pub fn into_settings(self) -> ForecastSettings {
        self.data
    }

    /// Write the current settings back to the store's path.
    pub fn persist(&self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
