//! Error types for playlist generation

use rtv_core::RtvError;
use thiserror::Error;

/// Generation errors
///
/// Only configuration problems abort a run. Everything else a run can run
/// into is absorbed and reported as a [`Notice`](crate::Notice).
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Break or category configuration that cannot drive a run
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error from the core crate
    #[error(transparent)]
    Core(RtvError),
}

impl From<RtvError> for ScheduleError {
    fn from(err: RtvError) -> Self {
        match err {
            RtvError::InvalidConfiguration(msg) => Self::InvalidConfiguration(msg),
            other => Self::Core(other),
        }
    }
}

/// Result type for generation
pub type Result<T> = std::result::Result<T, ScheduleError>;
