//! Error types for Verdex Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// The live model carries no definitions id and cannot be described
    #[error("Model '{0}' has no definitions id")]
    MissingDefinitionsId(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
