use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::db::helpers::{datetime_from_millis, parse_flexible_datetime};
use crate::error::ForecastError;
use crate::ingest::SampleSource;
use crate::models::Sample;
use crate::settings::DataSourceSettings;

/// Speed log exported from a spreadsheet as CSV with a header row, e.g.
/// `Date,AASPEED.PV/SIG` followed by one reading per line. Other columns are
/// ignored.
pub struct CsvSampleSource {
    path: PathBuf,
    columns: DataSourceSettings,
}

impl CsvSampleSource {
    pub fn new(path: PathBuf, columns: DataSourceSettings) -> Self {
        Self { path, columns }
    }
}

impl SampleSource for CsvSampleSource {
    fn load(&self) -> Result<Vec<Sample>, ForecastError> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
            .map_err(ForecastError::DataLoad)?;
        parse_csv(file, &self.columns)
            .with_context(|| format!("in {}", self.path.display()))
            .map_err(ForecastError::DataLoad)
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}

/// Read (timestamp, speed) pairs from CSV text, locating both columns by header.
pub fn parse_csv<R: std::io::Read>(input: R, columns: &DataSourceSettings) -> Result<Vec<Sample>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let headers = reader.headers().context("failed to read CSV header")?.clone();
    let timestamp_idx = column_index(&headers, &columns.timestamp_column)?;
    let speed_idx = column_index(&headers, &columns.speed_column)?;

    let mut samples = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("row {index}"))?;
        let sample = parse_record(&record, timestamp_idx, speed_idx)
            .with_context(|| format!("row {index}"))?;
        samples.push(sample);
    }
    Ok(samples)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| anyhow!("missing column '{name}'"))
}

fn parse_record(record: &StringRecord, timestamp_idx: usize, speed_idx: usize) -> Result<Sample> {
    let raw_timestamp = record
        .get(timestamp_idx)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("empty timestamp"))?;
    let raw_speed = record
        .get(speed_idx)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("empty speed"))?;

    // Bare integers are epoch milliseconds, as in the JSON rows.
    let timestamp = match raw_timestamp.parse::<i64>() {
        Ok(millis) => datetime_from_millis(millis)?,
        Err(_) => parse_flexible_datetime(raw_timestamp)?,
    };
    let speed = raw_speed
        .parse::<f64>()
        .with_context(|| format!("speed '{raw_speed}' is not a number"))?;

    Ok(Sample::new(timestamp, speed))
}
