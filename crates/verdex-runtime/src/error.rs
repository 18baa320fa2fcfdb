//! Runtime error types

use thiserror::Error;

/// Runtime error type
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// No container is deployed under the requested id
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// The engine backend could not open a session runtime
    #[error("Failed to open session for container '{container_id}': {reason}")]
    SessionCreation { container_id: String, reason: String },

    /// The engine reported an evaluation failure
    #[error("Engine evaluation failed: {0}")]
    EngineEvaluation(String),

    /// Metric registration against the supplied registry failed
    #[error("Metrics registration failed: {0}")]
    MetricsInit(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
