use thiserror::Error;
use wayfinder_core::error::{SimError, ValidationError};

/// Errors surfaced by [`NavTask::step`](crate::task::NavTask::step).
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid action: {0}")]
    Validation(#[from] ValidationError),

    #[error("Simulator error: {0}")]
    Simulator(#[from] SimError),
}
