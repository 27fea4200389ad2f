//! The recognizer
//!
//! Per-bone hard cutoffs keep one wildly-off bone from being masked by
//! summed error elsewhere; among statics that pass every cutoff, the
//! smallest summed residual wins. Motion templates accumulate in-order
//! frame matches under a translated comparison that factors out
//! whole-hand drift, and fire as soon as the completion fraction is
//! reached.

use tracing::{debug, trace};

use mudra_core::{Frame, Gesture, GestureKind, SessionTime};

use crate::{MatchConfig, RecognitionState};

/// How a gesture matched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    /// Static template; carries the summed position+rotation residual
    Static { residual: f32 },
    /// Motion template that reached its completion threshold
    Motion,
}

/// A successful recognition
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub name: String,
    pub kind: MatchKind,
}

/// Gesture recognizer with cross-poll motion progress and debounce
#[derive(Debug, Default)]
pub struct Recognizer {
    config: MatchConfig,
    state: RecognitionState,
}

impl Recognizer {
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    pub fn with_config(config: MatchConfig) -> Self {
        Recognizer {
            config,
            state: RecognitionState::new(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &RecognitionState {
        &self.state
    }

    /// Mark a recording session as started. Recognition is suppressed
    /// until [`finish_recording`](Self::finish_recording) plus the
    /// debounce delay.
    pub fn begin_recording(&mut self) {
        self.state.set_recording(true);
        self.state.reset_all();
    }

    /// Mark a recording session as finished at `now`, starting the
    /// debounce window.
    pub fn finish_recording(&mut self, now: SessionTime) {
        self.state.set_recording(false);
        self.state.mark_recorded(now);
    }

    /// Whether recognition is currently suppressed
    pub fn is_suppressed(&self, now: SessionTime) -> bool {
        self.state.suppressed(now, self.config.debounce_delay)
    }

    /// Evaluate the live frame against candidates, in the order given.
    ///
    /// Motion candidates are checked first within each candidate and
    /// short-circuit the poll the moment one reaches its completion
    /// threshold. Static candidates that survive every per-bone cutoff
    /// compete on summed residual; the first-encountered wins exact ties.
    ///
    /// A suppressed poll resets all motion progress and returns `None`
    /// without evaluating anything.
    pub fn recognize<'a, I>(&mut self, now: SessionTime, live: &Frame, candidates: I) -> Option<Match>
    where
        I: IntoIterator<Item = &'a Gesture>,
    {
        if self.is_suppressed(now) {
            self.state.reset_all();
            trace!("recognition suppressed");
            return None;
        }

        let mut best: Option<(f32, String)> = None;

        for gesture in candidates {
            match gesture.kind() {
                GestureKind::Motion => {
                    if self.advance_motion(gesture, live) {
                        debug!(gesture = gesture.name(), "motion gesture matched");
                        return Some(Match {
                            name: gesture.name().to_string(),
                            kind: MatchKind::Motion,
                        });
                    }
                }
                GestureKind::Static => {
                    if let Some(residual) = evaluate_static(&self.config, &gesture.frames()[0], live)
                    {
                        let closer = match &best {
                            Some((best_residual, _)) => residual < *best_residual,
                            None => true,
                        };
                        if closer {
                            best = Some((residual, gesture.name().to_string()));
                        }
                    }
                }
            }
        }

        best.map(|(residual, name)| {
            debug!(gesture = %name, residual, "static gesture matched");
            Match {
                name,
                kind: MatchKind::Static { residual },
            }
        })
    }

    /// Compare the live frame to the motion template's next expected
    /// frame; returns true when the gesture reaches its completion
    /// threshold.
    fn advance_motion(&mut self, gesture: &Gesture, live: &Frame) -> bool {
        let counter = self.state.counter(gesture.name());
        let Some(template) = gesture.frames().get(counter) else {
            self.state.reset(gesture.name());
            return false;
        };

        if !matches_translated(&self.config, template, live) {
            self.state.reset(gesture.name());
            return false;
        }

        let advanced = self.state.advance(gesture.name());
        if advanced >= self.config.required_frames(gesture.frame_count()) {
            self.state.reset(gesture.name());
            return true;
        }
        false
    }
}

/// Static comparison: every template bone (hand excluded) must exist in
/// the live frame and pass both cutoffs. Returns the summed residual,
/// or `None` when the candidate is discarded.
fn evaluate_static(config: &MatchConfig, template: &Frame, live: &Frame) -> Option<f32> {
    let mut sum = 0.0f32;

    for (name, bone) in template.iter_bones() {
        let live_bone = live.bone(name)?;

        let distance = bone.position.distance(&live_bone.position);
        if distance > config.position_threshold {
            return None;
        }

        let angle = bone.rotation.angle_to(&live_bone.rotation);
        if angle > config.rotation_threshold_deg {
            return None;
        }

        sum += distance + angle;
    }

    Some(sum)
}

/// Motion-frame comparison under the live hand's offset.
///
/// The live hand's positional and rotational deltas relative to the
/// template frame's recorded hand pose are applied to every template
/// bone before comparing, so whole-hand drift during the gesture does
/// not break matching. The hand's own rotational drift is gated
/// separately.
fn matches_translated(config: &MatchConfig, template: &Frame, live: &Frame) -> bool {
    let (Some(template_hand), Some(live_hand)) = (template.hand(), live.hand()) else {
        return false;
    };

    if live_hand.rotation.angle_to(&template_hand.rotation) > config.hand_rotation_threshold_deg {
        return false;
    }

    let offset = live_hand.position - template_hand.position;
    let twist = (live_hand.rotation * template_hand.rotation.conjugate()).normalize();

    for (name, bone) in template.iter_bones() {
        let Some(live_bone) = live.bone(name) else {
            return false;
        };

        let expected_position = bone.position + offset;
        if expected_position.distance(&live_bone.position) > config.position_threshold {
            return false;
        }

        let expected_rotation = twist * bone.rotation;
        if expected_rotation.angle_to(&live_bone.rotation) > config.motion_rotation_threshold_deg {
            return false;
        }
    }

    true
}

#[cfg(test)]
fn pose(x: f32, y: f32, z: f32) -> mudra_core::BonePose {
    mudra_core::BonePose::new(mudra_core::Vec3::new(x, y, z), mudra_core::Quat::IDENTITY)
}

#[cfg(test)]
fn frame_of(bones: &[(&str, mudra_core::BonePose)]) -> Frame {
    let mut frame = Frame::new();
    frame.set(mudra_core::HAND_POSITION, pose(0.0, 0.0, 0.0));
    for (name, bone_pose) in bones {
        frame.set(*name, *bone_pose);
    }
    frame
}
