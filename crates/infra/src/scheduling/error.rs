//! Scheduler error types

use std::time::Duration;

use medibook_domain::MedibookError;
use thiserror::Error;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Background task join failed
    #[error("Scheduler task join failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Stopping the scheduler timed out
    #[error("Scheduler stop timed out after {0:?}")]
    StopTimeout(Duration),
}

impl From<SchedulerError> for MedibookError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                MedibookError::InvalidInput(err.to_string())
            }
            _ => MedibookError::Internal(err.to_string()),
        }
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
