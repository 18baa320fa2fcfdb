//! Service error types

use thiserror::Error;
use verdex_core::CoreError;
use verdex_runtime::RuntimeError;

use crate::marshal::MarshalError;

/// Service error type
///
/// Every variant is caught at the dispatch boundary and converted into a
/// failure envelope; none of them escape to callers as panics or raw
/// errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The container id did not resolve to a deployed container
    #[error("Container resolution failed: {0}")]
    ContainerResolution(String),

    /// The caller's payload did not deserialize into an evaluation context
    #[error("Context deserialization failed: {0}")]
    ContextDeserialization(String),

    /// The engine failed to evaluate (session creation included)
    #[error("Engine evaluation failed: {0}")]
    EngineEvaluation(String),

    /// A live model could not be rendered into a descriptor
    #[error("Descriptor build failed: {0}")]
    DescriptorBuild(#[from] CoreError),
}

impl From<RuntimeError> for ServiceError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::ContainerNotFound(id) => ServiceError::ContainerResolution(id),
            RuntimeError::EngineEvaluation(message) => ServiceError::EngineEvaluation(message),
            other => ServiceError::EngineEvaluation(other.to_string()),
        }
    }
}

impl From<MarshalError> for ServiceError {
    fn from(err: MarshalError) -> Self {
        ServiceError::ContextDeserialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
