//! Pose source collaborator

use mudra_core::{BonePose, Frame, HAND_POSITION};

/// Supplier of live skeletal data.
///
/// Best-effort: a source may omit bones it cannot currently track, and
/// consumers tolerate heterogeneous per-frame bone sets.
pub trait PoseSource {
    /// Current per-bone poses (finger/limb bones)
    fn current_frame(&mut self) -> Frame;

    /// Current whole-hand root pose
    fn hand_root_pose(&mut self) -> BonePose;
}

/// Capture one complete frame: the source's bones plus the reserved
/// hand reference entry.
pub fn capture_frame(source: &mut dyn PoseSource) -> Frame {
    let mut frame = source.current_frame();
    frame.set(HAND_POSITION, source.hand_root_pose());
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use mudra_core::Vec3;

    struct FixedSource;

    impl PoseSource for FixedSource {
        fn current_frame(&mut self) -> Frame {
            let mut frame = Frame::new();
            frame.set("IndexTip", BonePose::default());
            frame
        }

        fn hand_root_pose(&mut self) -> BonePose {
            BonePose::new(Vec3::new(1.0, 0.0, 0.0), Default::default())
        }
    }

    #[test]
    fn test_capture_includes_hand() {
        let mut source = FixedSource;
        let frame = capture_frame(&mut source);
        assert!(frame.hand().is_some());
        assert!(frame.bone("IndexTip").is_some());
        assert_eq!(frame.len(), 2);
    }
}
