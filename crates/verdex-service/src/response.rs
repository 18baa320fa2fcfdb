//! Uniform response envelope for service operations

use serde::{Deserialize, Serialize};

/// Terminal state of a service call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// Envelope wrapping every service operation's result
///
/// A failure envelope carries a diagnostic message and no payload. Partial
/// successes do not exist at this level: per-decision errors live inside
/// the payload of a success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> ServiceResponse<T> {
    /// Build a success envelope
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            payload: Some(payload),
        }
    }

    /// Build a failure envelope
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failure,
            message: message.into(),
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
