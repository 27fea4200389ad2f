//! Cross-poll recognition state

use std::collections::HashMap;
use std::time::Duration;

use mudra_core::SessionTime;

/// Mutable recognizer state carried between polls.
///
/// Motion progress counters are per gesture name and only meaningful
/// across strictly consecutive polls: any suppressed poll clears them,
/// so partial credit never spans a gap in sampling.
#[derive(Debug, Default)]
pub struct RecognitionState {
    /// Per-motion-gesture count of consecutive matched frames
    counters: HashMap<String, usize>,
    /// When the last recording finished (starts the debounce window)
    last_record_time: Option<SessionTime>,
    /// A recording session is in progress
    recording: bool,
}

impl RecognitionState {
    pub fn new() -> Self {
        RecognitionState::default()
    }

    pub fn counter(&self, gesture: &str) -> usize {
        self.counters.get(gesture).copied().unwrap_or(0)
    }

    pub(crate) fn advance(&mut self, gesture: &str) -> usize {
        let counter = self.counters.entry(gesture.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    pub(crate) fn reset(&mut self, gesture: &str) {
        self.counters.remove(gesture);
    }

    /// Clear all in-progress motion counters
    pub fn reset_all(&mut self) {
        self.counters.clear();
    }

    pub fn recording(&self) -> bool {
        self.recording
    }

    pub(crate) fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub(crate) fn mark_recorded(&mut self, at: SessionTime) {
        self.last_record_time = Some(at);
    }

    /// Whether recognition is suppressed at `now` for the given delay
    pub fn suppressed(&self, now: SessionTime, delay: Duration) -> bool {
        if self.recording {
            return true;
        }
        match self.last_record_time {
            Some(recorded) => now <= recorded + delay,
            None => false,
        }
    }
}
