//! Error types for the prize wheel

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum WheelError {
    #[error("Wheel has no segments")]
    EmptyWheel,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Segment index {index} out of range for {len} segments")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Wheel is spinning")]
    Busy,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for WheelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type alias
pub type WheelResult<T> = Result<T, WheelError>;
