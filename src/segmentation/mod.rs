pub mod aggregate;
pub mod algorithm;
pub mod config;

pub use aggregate::AggregateStats;
pub use algorithm::{segment_firings, DataQualityWarning, SegmentationOutcome};
pub use config::SegmentationConfig;
