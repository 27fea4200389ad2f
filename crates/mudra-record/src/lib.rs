//! MUDRA Record - Capturing gesture templates from a pose source
//!
//! A recording session samples frames cooperatively: one sample per
//! poll at most, control returned to the scheduler between samples.
//! Durations at or below the static threshold capture exactly one frame
//! and complete immediately.

pub mod session;
pub mod source;

pub use session::*;
pub use source::*;
