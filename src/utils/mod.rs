pub mod logging;
pub mod math;

pub use math::safe_divide;
