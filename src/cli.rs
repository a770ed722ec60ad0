use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::db::SampleStore;
use crate::ingest::{is_sqlite_path, source_for_path};
use crate::pipeline::{prepare_samples, Pipeline};
use crate::settings::{ForecastSettings, SettingsStore};
use crate::log_info;

const ENABLE_LOGS: bool = true;

#[derive(Parser)]
#[command(name = "eoh-forecast", about = "Overhaul forecasting from machine speed logs")]
pub struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a speed log and forecast the next overhaul
    Forecast {
        /// Speed log: JSON rows, a CSV export (.csv), or a SQLite store (.sqlite/.sqlite3/.db)
        #[arg(short, long)]
        data: PathBuf,
        /// Settings file (JSON); defaults apply when omitted or missing
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the fired speed threshold (RPM)
        #[arg(long)]
        threshold: Option<f64>,
        /// Override the overhaul fired-hour budget
        #[arg(long)]
        budget: Option<f64>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import a JSON or CSV speed log into a SQLite sample store
    Import {
        #[arg(short, long)]
        data: PathBuf,
        /// Target SQLite file; created if missing
        #[arg(long)]
        db: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Drop existing samples before importing
        #[arg(long)]
        replace: bool,
    },
    /// Write a settings file populated with defaults
    InitConfig {
        #[arg(short, long)]
        path: PathBuf,
    },
}

fn load_settings(config: Option<&Path>) -> Result<ForecastSettings> {
    match config {
        Some(path) => Ok(SettingsStore::new(path.to_path_buf())?.into_settings()),
        None => Ok(ForecastSettings::default()),
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Forecast {
            data,
            config,
            threshold,
            budget,
            json,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            if let Some(threshold) = threshold {
                settings.fired_speed_threshold = threshold;
            }
            if let Some(budget) = budget {
                settings.overhaul_hour_budget = budget;
            }

            let pipeline = Pipeline::new(&settings)?;
            let source = source_for_path(&data, &settings.data_source);
            log_info!("Loading samples from {}", source.describe());
            let samples = source.load()?;
            let report = pipeline.run(samples)?;

            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.render_text());
            }
        }
        Commands::Import {
            data,
            db,
            config,
            replace,
        } => {
            if is_sqlite_path(&data) {
                bail!("import expects a JSON or CSV speed log, got {}", data.display());
            }
            let settings = load_settings(config.as_deref())?;
            let source = source_for_path(&data, &settings.data_source);
            let samples = prepare_samples(source.load()?)?;

            let mut store = SampleStore::open(db)?;
            if replace {
                store.clear_samples()?;
            }
            let written = store.insert_samples(&samples)?;
            let total = store.sample_count()?;
            log_info!("Imported {} samples from {}", written, source.describe());
            println!("Imported {written} samples ({total} in store)");
        }
        Commands::InitConfig { path } => {
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            let store = SettingsStore::new(path.clone())?;
            store
                .persist()
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote default settings to {}", path.display());
        }
    }
    Ok(())
}
