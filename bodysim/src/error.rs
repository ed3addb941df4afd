//! Crate-wide error type
//!
//! Setup problems (`InvalidConfig`, `ThreadPool`) stop a run before the first
//! step. Collaborator problems (`Render`, `Encode`, `Io`) are logged where they
//! happen and never abort the physics loop.

use thiserror::Error;

/// Crate-wide result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Scenario or run parameters that cannot produce a defined simulation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A frame could not be rendered or written
    #[error("render failed for frame {frame}: {message}")]
    Render { frame: usize, message: String },

    /// The video encoder could not be started or exited with failure
    #[error("video encoding failed: {0}")]
    Encode(String),

    /// The render worker pool could not be created
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
