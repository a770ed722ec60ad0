//! Data-loading collaborators.
//!
//! The forecasting pipeline only needs a list of samples; where they come from is
//! decided here.

pub mod delimited;
pub mod json;

use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::db::SampleStore;
use crate::error::ForecastError;
use crate::models::Sample;
use crate::settings::DataSourceSettings;

pub use delimited::CsvSampleSource;
pub use json::JsonSampleSource;

pub trait SampleSource {
    /// One-shot, blocking load of the whole dataset.
    fn load(&self) -> Result<Vec<Sample>, ForecastError>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// Samples previously imported into a SQLite store.
pub struct SqliteSampleSource {
    path: PathBuf,
}

impl SqliteSampleSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SampleSource for SqliteSampleSource {
    fn load(&self) -> Result<Vec<Sample>, ForecastError> {
        if !self.path.exists() {
            return Err(ForecastError::DataLoad(anyhow!(
                "database {} does not exist",
                self.path.display()
            )));
        }
        let store = SampleStore::open(self.path.clone()).map_err(ForecastError::DataLoad)?;
        store.get_samples().map_err(ForecastError::DataLoad)
    }

    fn describe(&self) -> String {
        format!("SQLite store {}", self.path.display())
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

pub fn is_sqlite_path(path: &Path) -> bool {
    matches!(
        lowercase_extension(path).as_deref(),
        Some("sqlite" | "sqlite3" | "db")
    )
}

/// Pick a loader by file extension: SQLite stores, CSV exports, JSON otherwise.
pub fn source_for_path(path: &Path, columns: &DataSourceSettings) -> Box<dyn SampleSource> {
    let path = path.to_path_buf();
    match lowercase_extension(&path).as_deref() {
        Some("sqlite" | "sqlite3" | "db") => Box::new(SqliteSampleSource::new(path)),
        Some("csv") => Box::new(CsvSampleSource::new(path, columns.clone())),
        _ => Box::new(JsonSampleSource::new(path, columns.clone())),
    }
}
