//! Error types.
//!
//! [`AnimationError`] covers the animation engine itself. [`AppError`] wraps
//! everything the command-line front end can fail on.

use std::path::PathBuf;

use thiserror::Error;

/// Returned by a [`RenderSink`](crate::sink::RenderSink) whose display target
/// no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("render target is no longer available")]
pub struct SinkUnavailable;

/// Errors raised by the animation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    /// Rejected at `start`/`reveal` time, before anything is scheduled.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error(transparent)]
    SinkUnavailable(#[from] SinkUnavailable),
}

impl AnimationError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        AnimationError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the `typist` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported script format: {} (expected .yaml, .yml or .json)", path.display())]
    UnsupportedScriptFormat { path: PathBuf },

    #[error("cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("nothing to animate: pass text as an argument or use --file/--script")]
    MissingInput,

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Animation(#[from] AnimationError),
}
