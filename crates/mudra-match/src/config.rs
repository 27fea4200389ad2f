//! Recognition thresholds

use std::time::Duration;

/// Matching thresholds and the post-record debounce delay
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Maximum per-bone position distance for a static match (units)
    pub position_threshold: f32,
    /// Maximum per-bone rotation distance for a static match (degrees)
    pub rotation_threshold_deg: f32,
    /// Maximum per-bone rotation distance within a motion frame (degrees)
    pub motion_rotation_threshold_deg: f32,
    /// Maximum whole-hand rotation drift within a motion frame (degrees)
    pub hand_rotation_threshold_deg: f32,
    /// Fraction of a motion template's frames that must match, in order,
    /// before the gesture fires
    pub motion_completion: f32,
    /// Recognition stays suppressed for this long after a recording ends
    pub debounce_delay: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            position_threshold: 1.0,
            rotation_threshold_deg: 20.0,
            motion_rotation_threshold_deg: 35.0,
            hand_rotation_threshold_deg: 50.0,
            motion_completion: 0.9,
            debounce_delay: Duration::from_secs(1),
        }
    }
}

impl MatchConfig {
    /// Number of in-order frame matches a motion template needs to fire
    pub fn required_frames(&self, frame_count: usize) -> usize {
        (self.motion_completion * frame_count as f32).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_frames() {
        let config = MatchConfig::default();
        assert_eq!(config.required_frames(3), 3); // ceil(2.7)
        assert_eq!(config.required_frames(10), 9);
        assert_eq!(config.required_frames(20), 18);
    }
}
