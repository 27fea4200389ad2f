//! MUDRA Test Harness - Scripted collaborators and end-to-end validation
//!
//! This crate provides:
//! - Scripted pose sources and response probes
//! - Frame-building helpers
//! - End-to-end workflow tests (record → name → assign → save →
//!   recognize → dispatch, and full mini-game runs)

pub mod integration;
pub mod simulator;

pub use integration::*;
pub use simulator::*;
