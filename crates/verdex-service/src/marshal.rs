//! Payload marshalling
//!
//! Callers submit the evaluation context as text in a declared content
//! format. Marshalling is a collaborator seam: the default implementation
//! covers JSON and YAML, and embedders can plug their own.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use verdex_core::EvaluationContext;

/// Marshalling error type
#[derive(Error, Debug)]
pub enum MarshalError {
    /// The declared content format is not supported
    #[error("Unsupported content format: {0}")]
    UnsupportedFormat(String),

    /// The payload did not parse in the declared format
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Content format of a submitted payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentFormat {
    Json,
    Yaml,
}

impl FromStr for ContentFormat {
    type Err = MarshalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "JSON" => Ok(ContentFormat::Json),
            "YAML" => Ok(ContentFormat::Yaml),
            other => Err(MarshalError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Deserializes caller payloads into evaluation contexts
pub trait Marshaller: Send + Sync {
    fn unmarshal_context(
        &self,
        payload: &str,
        format: ContentFormat,
    ) -> Result<EvaluationContext, MarshalError>;
}

/// Default marshaller built on serde
#[derive(Debug, Default)]
pub struct SerdeMarshaller;

impl Marshaller for SerdeMarshaller {
    fn unmarshal_context(
        &self,
        payload: &str,
        format: ContentFormat,
    ) -> Result<EvaluationContext, MarshalError> {
        match format {
            ContentFormat::Json => {
                serde_json::from_str(payload).map_err(|e| MarshalError::Malformed(e.to_string()))
            }
            ContentFormat::Yaml => {
                serde_yaml::from_str(payload).map_err(|e| MarshalError::Malformed(e.to_string()))
            }
        }
    }
}
