pub mod cli;
pub mod db;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod segmentation;
pub mod settings;
pub mod severity;
pub mod utils;

use clap::Parser;

pub use error::ForecastError;
pub use pipeline::Pipeline;
pub use report::ForecastReport;
pub use settings::ForecastSettings;

const ENABLE_LOGS: bool = true;

pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    utils::logging::init_logging();

    log::info!("EOH forecast starting up...");

    let cli = cli::Cli::parse();
    if let Err(err) = cli::execute(cli) {
        log_error!("{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
