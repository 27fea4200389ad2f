//! Recording sessions

use std::time::Duration;

use tracing::debug;

use mudra_core::{Frame, SessionTime};

use crate::{capture_frame, PoseSource};

/// Recording cadence
#[derive(Clone, Debug)]
pub struct RecordConfig {
    /// Fixed nominal sampling period (20 Hz)
    pub sample_period: Duration,
    /// Durations at or below this capture a single static frame
    pub static_threshold: Duration,
}

impl Default for RecordConfig {
    fn default() -> Self {
        RecordConfig {
            sample_period: Duration::from_millis(50),
            static_threshold: Duration::from_millis(10),
        }
    }
}

/// Progress of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// Still sampling; poll again next tick
    Sampling,
    /// The full frame sequence has been captured
    Complete,
}

/// A bounded recording of frames from a pose source.
///
/// The first frame is captured at `begin`; subsequent frames are
/// captured by `poll`, at most one per call, whenever the sample period
/// has elapsed. The session completes once elapsed time reaches the
/// requested duration. Bones the source cannot supply are simply absent
/// from that frame.
pub struct RecordingSession {
    config: RecordConfig,
    duration: Duration,
    started_at: SessionTime,
    next_sample_at: SessionTime,
    frames: Vec<Frame>,
    complete: bool,
}

impl RecordingSession {
    /// Start recording at `now`.
    ///
    /// A duration at or below the static threshold captures exactly one
    /// frame and completes immediately.
    pub fn begin(
        config: RecordConfig,
        duration: Duration,
        source: &mut dyn PoseSource,
        now: SessionTime,
    ) -> Self {
        let first = capture_frame(source);
        let is_static = duration <= config.static_threshold;
        let next_sample_at = now + config.sample_period;

        debug!(
            seconds = duration.as_secs_f64(),
            is_static, "recording started"
        );

        RecordingSession {
            config,
            duration,
            started_at: now,
            next_sample_at,
            frames: vec![first],
            complete: is_static,
        }
    }

    /// Advance the session. Captures at most one frame per call.
    pub fn poll(&mut self, source: &mut dyn PoseSource, now: SessionTime) -> RecordStatus {
        if self.complete {
            return RecordStatus::Complete;
        }

        if now >= self.next_sample_at {
            self.frames.push(capture_frame(source));
            self.next_sample_at = self.next_sample_at + self.config.sample_period;
        }

        if now.since(self.started_at) >= self.duration {
            self.complete = true;
            debug!(frames = self.frames.len(), "recording complete");
            return RecordStatus::Complete;
        }

        RecordStatus::Sampling
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Consume the session, yielding the ordered frame sequence
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}
