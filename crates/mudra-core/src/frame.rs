//! Bone poses and frames
//!
//! A frame is one instantaneous snapshot of named bone poses. Every
//! captured frame carries the reserved `"HandPosition"` entry: the pose
//! of the whole-hand root, distinct from any finger bone. Pose sources
//! are best-effort, so frames may omit individual finger bones and
//! consumers must tolerate heterogeneous bone sets.

use std::collections::HashMap;

use crate::{Quat, Vec3};

/// Reserved bone name for the whole-hand reference pose
pub const HAND_POSITION: &str = "HandPosition";

/// Immutable snapshot of a single bone's pose
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BonePose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl BonePose {
    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        BonePose { position, rotation }
    }
}

/// One instantaneous snapshot of named bone poses
#[derive(Debug, Clone, Default)]
pub struct Frame {
    bones: HashMap<String, BonePose>,
}

impl Frame {
    pub fn new() -> Self {
        Frame::default()
    }

    /// Insert or replace a bone pose
    pub fn set(&mut self, name: impl Into<String>, pose: BonePose) {
        self.bones.insert(name.into(), pose);
    }

    /// Exact-name lookup
    pub fn bone(&self, name: &str) -> Option<&BonePose> {
        self.bones.get(name)
    }

    /// The whole-hand reference pose, if captured
    pub fn hand(&self) -> Option<&BonePose> {
        self.bones.get(HAND_POSITION)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bones.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Iterate over all entries, including `"HandPosition"`
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BonePose)> {
        self.bones.iter()
    }

    /// Iterate over finger/limb bones, excluding the hand reference entry
    pub fn iter_bones(&self) -> impl Iterator<Item = (&String, &BonePose)> {
        self.bones.iter().filter(|(name, _)| *name != HAND_POSITION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_entry_excluded_from_bones() {
        let mut frame = Frame::new();
        frame.set(HAND_POSITION, BonePose::default());
        frame.set("IndexTip", BonePose::default());
        frame.set("ThumbTip", BonePose::default());

        assert_eq!(frame.len(), 3);
        assert_eq!(frame.iter_bones().count(), 2);
        assert!(frame.hand().is_some());
    }

    #[test]
    fn test_missing_bone() {
        let frame = Frame::new();
        assert!(frame.bone("IndexTip").is_none());
        assert!(frame.hand().is_none());
    }
}
