use std::{fs, path::PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

use crate::db::helpers::{datetime_from_millis, parse_flexible_datetime};
use crate::error::ForecastError;
use crate::ingest::SampleSource;
use crate::models::Sample;
use crate::settings::DataSourceSettings;

/// Speed log exported as a JSON array of row objects, e.g.
/// `[{"Date": "2024-01-01 00:00:00", "AASPEED.PV/SIG": 3012.4}, ...]`.
pub struct JsonSampleSource {
    path: PathBuf,
    columns: DataSourceSettings,
}

impl JsonSampleSource {
    pub fn new(path: PathBuf, columns: DataSourceSettings) -> Self {
        Self { path, columns }
    }
}

impl SampleSource for JsonSampleSource {
    fn load(&self) -> Result<Vec<Sample>, ForecastError> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
            .map_err(ForecastError::DataLoad)?;
        let document: Value = serde_json::from_str(&contents)
            .with_context(|| format!("{} is not valid JSON", self.path.display()))
            .map_err(ForecastError::DataLoad)?;
        parse_rows(&document, &self.columns).map_err(ForecastError::DataLoad)
    }

    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }
}

/// Pull (timestamp, speed) pairs out of an array of row objects.
pub fn parse_rows(document: &Value, columns: &DataSourceSettings) -> Result<Vec<Sample>> {
    let rows = document
        .as_array()
        .ok_or_else(|| anyhow!("expected a JSON array of rows"))?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| parse_row(row, columns).with_context(|| format!("row {index}")))
        .collect()
}

fn parse_row(row: &Value, columns: &DataSourceSettings) -> Result<Sample> {
    let object = row
        .as_object()
        .ok_or_else(|| anyhow!("expected an object"))?;

    let raw_timestamp = object
        .get(&columns.timestamp_column)
        .ok_or_else(|| anyhow!("missing column '{}'", columns.timestamp_column))?;
    let raw_speed = object
        .get(&columns.speed_column)
        .ok_or_else(|| anyhow!("missing column '{}'", columns.speed_column))?;

    let timestamp = match raw_timestamp {
        Value::String(text) => parse_flexible_datetime(text)?,
        Value::Number(n) => match n.as_i64() {
            Some(millis) => datetime_from_millis(millis)?,
            None => bail!("timestamp {n} is not an integer epoch in milliseconds"),
        },
        other => bail!("unsupported timestamp value {other}"),
    };

    let speed = match raw_speed {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| anyhow!("speed {n} is not representable as f64"))?,
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .with_context(|| format!("speed '{text}' is not a number"))?,
        other => bail!("unsupported speed value {other}"),
    };

    Ok(Sample::new(timestamp, speed))
}
