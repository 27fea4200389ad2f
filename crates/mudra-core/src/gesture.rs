//! Gesture templates
//!
//! A gesture is a named, ordered sequence of frames. One frame makes a
//! static gesture; more than one makes a motion gesture sampled at the
//! recorder's fixed nominal period. The optional response name is a lazy
//! reference into the response registry, resolved at dispatch time.

use crate::{Frame, MudraError, MudraResult};

/// Template kind, derived from the frame count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Single-frame template matched against one live frame
    Static,
    /// Multi-frame template requiring sequential progress
    Motion,
}

/// A named gesture template
#[derive(Debug, Clone)]
pub struct Gesture {
    name: String,
    frames: Vec<Frame>,
    response_name: Option<String>,
}

impl Gesture {
    /// Create a gesture from an ordered frame sequence.
    ///
    /// An empty sequence is rejected: gestures are never partially
    /// constructed.
    pub fn new(name: impl Into<String>, frames: Vec<Frame>) -> MudraResult<Self> {
        let name = name.into();
        if frames.is_empty() {
            return Err(MudraError::EmptyGesture(name));
        }
        Ok(Gesture {
            name,
            frames,
            response_name: None,
        })
    }

    /// Attach the name of the response this gesture triggers
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response_name = Some(response.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn response_name(&self) -> Option<&str> {
        self.response_name.as_deref()
    }

    pub fn kind(&self) -> GestureKind {
        if self.frames.len() == 1 {
            GestureKind::Static
        } else {
            GestureKind::Motion
        }
    }

    pub fn is_static(&self) -> bool {
        self.kind() == GestureKind::Static
    }

    pub fn is_motion(&self) -> bool {
        self.kind() == GestureKind::Motion
    }
}
