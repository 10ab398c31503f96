//! Harness errors.

use pen_core::PenError;
use thiserror::Error;

/// Errors that abort a scenario run.
#[derive(Debug, Error)]
pub enum SimError {
    /// The farm could not be built
    #[error(transparent)]
    Pen(#[from] PenError),
    
    /// The scheduler task ended without reporting its statistics
    #[error("Scheduler task ended without reporting")]
    SchedulerLost,
}
