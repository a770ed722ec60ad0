/// Configuration for firing-event segmentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationConfig {
    /// Speed (RPM) above which a sample counts as fired.
    pub fired_speed_threshold: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            fired_speed_threshold: 1100.0,
        }
    }
}
