// Error taxonomy for the fusion engine
use thiserror::Error;

/// Engine failures fall into two classes: bad input caught before any
/// computation starts, and failures during interpolation, matching or
/// metrics computation. Nothing is silently recovered; callers check
/// and propagate.
#[derive(Debug, Error)]
pub enum FusionError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("processing error: {0}")]
    Processing(String),
}

impl FusionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }
}
