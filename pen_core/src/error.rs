//! Error types for the pen engine.

use pen_env::{EnvError, PenId};
use thiserror::Error;

/// Errors raised by pens, the registry and configuration.
///
/// Every variant is recoverable: the scheduler logs them and keeps running.
#[derive(Debug, Error)]
pub enum PenError {
    /// Attempted to remove a human from an empty pen
    #[error("Pen '{0}' has no humans to remove")]
    EmptyPen(PenId),

    /// A pen identifier that is not in the registry
    #[error("Unknown pen: '{0}'")]
    UnknownPen(PenId),

    /// Two pens share a title
    #[error("Duplicate pen title: '{0}'")]
    DuplicatePen(PenId),

    /// The option's gating condition no longer holds
    #[error("Option '{option}' is not available at '{pen}'")]
    OptionUnavailable {
        option: &'static str,
        pen: PenId,
    },

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Environment failure (closed channel)
    #[error(transparent)]
    Env(#[from] EnvError),
}

impl PenError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
