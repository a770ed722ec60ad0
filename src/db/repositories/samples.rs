use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::{
    helpers::{format_datetime, parse_datetime},
    SampleStore,
};
use crate::models::Sample;

impl SampleStore {
    /// Insert samples in one transaction. Returns the number written.
    pub fn insert_samples(&mut self, samples: &[Sample]) -> Result<usize> {
        let tx = self
            .connection_mut()
            .transaction()
            .context("failed to open insert transaction")?;
        {
            let mut stmt = tx.prepare("INSERT INTO speed_samples (timestamp, speed) VALUES (?1, ?2)")?;
            for sample in samples {
                stmt.execute(params![format_datetime(&sample.timestamp), sample.speed])
                    .with_context(|| {
                        format!("failed to insert sample at {}", sample.timestamp.to_rfc3339())
                    })?;
            }
        }
        tx.commit().context("failed to commit samples")?;
        Ok(samples.len())
    }

    /// All samples, oldest first.
    pub fn get_samples(&self) -> Result<Vec<Sample>> {
        let mut stmt = self.connection().prepare(
            "SELECT timestamp, speed
             FROM speed_samples
             ORDER BY timestamp ASC, id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let timestamp_str: String = row.get(0)?;
            let speed: f64 = row.get(1)?;
            Ok((timestamp_str, speed))
        })?;

        let mut samples = Vec::new();
        for row in rows {
            let (timestamp_str, speed) = row?;
            let timestamp = parse_datetime(&timestamp_str, "timestamp")?;
            samples.push(Sample::new(timestamp, speed));
        }

        Ok(samples)
    }

    pub fn sample_count(&self) -> Result<usize> {
        let count: i64 = self
            .connection()
            .query_row("SELECT COUNT(*) FROM speed_samples", [], |row| row.get(0))
            .context("failed to count samples")?;
        Ok(count as usize)
    }

    pub fn clear_samples(&mut self) -> Result<()> {
        self.connection()
            .execute("DELETE FROM speed_samples", [])
            .context("failed to clear samples")?;
        Ok(())
    }
}
