//! MUDRA Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the MUDRA engine:
//! - 3D math (Vec3, unit quaternions)
//! - Bone poses and frames
//! - Gesture templates (static and motion)
//! - Session time
//! - Error types

pub mod error;
pub mod frame;
pub mod gesture;
pub mod math;
pub mod time;

pub use error::*;
pub use frame::*;
pub use gesture::*;
pub use math::*;
pub use time::*;
