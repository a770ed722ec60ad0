pub mod interval;
pub mod sample;

pub use interval::FiringInterval;
pub use sample::{mark_fired, FiredSample, Sample};
