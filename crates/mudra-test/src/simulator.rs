//! Scripted collaborator doubles

use std::sync::Arc;

use parking_lot::Mutex;

use mudra_core::{BonePose, Frame, Quat, Vec3, HAND_POSITION};
use mudra_flow::Response;
use mudra_record::PoseSource;

/// Build a bone pose at a position with identity rotation
pub fn pose_at(x: f32, y: f32, z: f32) -> BonePose {
    BonePose::new(Vec3::new(x, y, z), Quat::IDENTITY)
}

/// Build a frame with the hand at the origin and the given bones
pub fn simple_frame(bones: &[(&str, [f32; 3])]) -> Frame {
    let mut frame = Frame::new();
    frame.set(HAND_POSITION, BonePose::default());
    for (name, [x, y, z]) in bones {
        frame.set(*name, pose_at(*x, *y, *z));
    }
    frame
}

/// Pose source that serves a scripted frame sequence, one frame per
/// capture, holding the last frame once the script runs out.
pub struct ScriptedPoseSource {
    frames: Vec<Frame>,
    cursor: usize,
    last_hand: Option<BonePose>,
}

impl ScriptedPoseSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        ScriptedPoseSource {
            frames,
            cursor: 0,
            last_hand: None,
        }
    }

    /// Source frozen on a single pose
    pub fn holding(frame: Frame) -> Self {
        Self::new(vec![frame])
    }

    /// Frames served so far
    pub fn served(&self) -> usize {
        self.cursor
    }
}

impl PoseSource for ScriptedPoseSource {
    fn current_frame(&mut self) -> Frame {
        let index = self.cursor.min(self.frames.len().saturating_sub(1));
        let frame = self.frames.get(index).cloned().unwrap_or_default();
        self.last_hand = frame.hand().copied();
        if self.cursor < self.frames.len() {
            self.cursor += 1;
        }
        frame
    }

    fn hand_root_pose(&mut self) -> BonePose {
        self.last_hand.unwrap_or_default()
    }
}

/// Response double that counts invocations
pub struct ResponseProbe {
    name: String,
    invocations: Mutex<u64>,
}

impl ResponseProbe {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(ResponseProbe {
            name: name.into(),
            invocations: Mutex::new(0),
        })
    }

    pub fn invocations(&self) -> u64 {
        *self.invocations.lock()
    }
}

impl Response for ResponseProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) {
        *self.invocations.lock() += 1;
    }
}
