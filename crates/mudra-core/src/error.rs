//! Error types for the MUDRA engine

use thiserror::Error;

/// Engine-wide errors
#[derive(Error, Debug)]
pub enum MudraError {
    // Template errors
    #[error("Gesture '{0}' has no frames")]
    EmptyGesture(String),

    // Persistence errors
    #[error("Persistence I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid gesture record: {0}")]
    InvalidRecord(String),
}

/// Result type for MUDRA operations
pub type MudraResult<T> = Result<T, MudraError>;
