pub mod projection;
pub mod types;

pub use projection::{forecast, project_trend};
pub use types::{Forecast, ForecastConfig, ForecastResult, TrendProjection};
