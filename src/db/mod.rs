//! SQLite-backed store of raw speed samples.
//!
//! Only ingested samples live here. Forecasts are recomputed on every run and are
//! never written back.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::{error, info};
use rusqlite::Connection;

pub mod helpers;
pub mod repositories;

/// Stored in `PRAGMA user_version` once `speed_samples` exists.
const SCHEMA_VERSION: i32 = 1;

pub struct SampleStore {
    conn: Connection,
}

impl SampleStore {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let mut conn = Connection::open(&db_path).context("failed to open SQLite database")?;

        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }

        ensure_schema(&mut conn)?;

        info!("Sample store opened at {}", db_path.display());

        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let mut conn =
            Connection::open_in_memory().context("failed to open in-memory SQLite database")?;
        ensure_schema(&mut conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// Create the sample table on a fresh file; refuse any other layout version.
fn ensure_schema(conn: &mut Connection) -> Result<()> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    match version {
        0 => {
            let tx = conn
                .transaction()
                .context("failed to open schema transaction")?;
            tx.execute_batch(include_str!("schemas/speed_samples.sql"))
                .context("failed to create speed_samples table")?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)
                .context("failed to update user_version pragma")?;
            tx.commit().context("failed to commit schema")?;
            info!("Created sample store schema v{SCHEMA_VERSION}");
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        other => bail!(
            "sample store has schema version {other}, this build understands {SCHEMA_VERSION}"
        ),
    }
}
