use thiserror::Error;

/// Fatal errors that stop a forecast run.
///
/// Non-fatal anomalies (for example a zero-length firing interval) are not errors;
/// they are collected as [`crate::segmentation::DataQualityWarning`] values.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The data collaborator could not produce a dataset.
    #[error("failed to load speed data")]
    DataLoad(#[source] anyhow::Error),
    /// No sample ever crossed the fired threshold, so there is no startup date.
    #[error("no fired samples in dataset (threshold {threshold} RPM); cannot establish a startup date")]
    NoFiringData { threshold: f64 },
    #[error("invalid severity curve: {0}")]
    InvalidCurve(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// A budget-driven date landed outside the representable calendar.
    #[error("{projection} overhaul date is out of range ({offset_hours} h after {base})")]
    ProjectionOutOfRange {
        projection: &'static str,
        base: chrono::DateTime<chrono::Utc>,
        offset_hours: f64,
    },
}
