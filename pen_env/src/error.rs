//! Error types for the pen environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// The receiving side of a bus channel was dropped
    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),
}

impl EnvError {
    /// Creates a closed-channel error for the named channel.
    pub fn closed(channel: &'static str) -> Self {
        Self::ChannelClosed(channel)
    }
}
